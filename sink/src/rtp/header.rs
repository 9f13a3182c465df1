// header.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

/// Size of the fixed RTP header (RFC 3550 section 5.1)
pub const RTP_FIXED_HEADER_LEN: usize = 12;

pub const RTP_VERSION: u8 = 2;

/// Fixed part of an RTP header, enough to route a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeader {
    pub padding: bool,
    pub extension: bool,
    pub csrc_count: u8,
    pub marker: bool,
    pub payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    pub ssrc: u32,
}

impl RtpHeader {
    /// Returns None for anything that is not an RTP v2 packet with a complete
    /// fixed header and CSRC list.
    pub fn parse(packet: &[u8]) -> Option<Self> {
        if packet.len() < RTP_FIXED_HEADER_LEN {
            return None;
        }

        let version = packet[0] >> 6;
        if version != RTP_VERSION {
            return None;
        }

        let csrc_count = packet[0] & 0x0f;
        if packet.len() < RTP_FIXED_HEADER_LEN + 4 * csrc_count as usize {
            return None;
        }

        Some(Self {
            padding: packet[0] & 0x20 != 0,
            extension: packet[0] & 0x10 != 0,
            csrc_count,
            marker: packet[1] & 0x80 != 0,
            payload_type: packet[1] & 0x7f,
            sequence_number: u16::from_be_bytes([packet[2], packet[3]]),
            timestamp: u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]),
            ssrc: u32::from_be_bytes([packet[8], packet[9], packet[10], packet[11]]),
        })
    }

    /// RTCP multiplexed on the same port (RFC 5761) shows up as payload types 72-76.
    pub fn is_rtcp(&self) -> bool {
        (72..=76).contains(&self.payload_type)
    }
}
