// header_tests.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use super::header::*;

fn packet(first: u8, second: u8, payload: &[u8]) -> Vec<u8> {
    let mut p = vec![
        first, second, 0x12, 0x34, // sequence number
        0x00, 0x01, 0x5f, 0x90, // timestamp
        0xde, 0xad, 0xbe, 0xef, // ssrc
    ];
    p.extend_from_slice(payload);
    p
}

#[test]
fn test_parse_fixed_header() {
    let header = RtpHeader::parse(&packet(0x80, 0xe0, b"payload")).unwrap();
    assert!(!header.padding);
    assert!(!header.extension);
    assert_eq!(header.csrc_count, 0);
    assert!(header.marker);
    assert_eq!(header.payload_type, 96);
    assert_eq!(header.sequence_number, 0x1234);
    assert_eq!(header.timestamp, 90_000);
    assert_eq!(header.ssrc, 0xdeadbeef);
    assert!(!header.is_rtcp());
}

#[test]
fn test_parse_header_only_packet() {
    let header = RtpHeader::parse(&packet(0x80, 0x6f, &[])).unwrap();
    assert!(!header.marker);
    assert_eq!(header.payload_type, 111);
}

#[test]
fn test_parse_flags_and_csrcs() {
    let header = RtpHeader::parse(&packet(0xb2, 0x00, &[0u8; 8])).unwrap();
    assert!(header.padding);
    assert!(header.extension);
    assert_eq!(header.csrc_count, 2);
    assert_eq!(header.payload_type, 0);
}

#[test]
fn test_truncated_csrc_list_is_rejected() {
    assert!(RtpHeader::parse(&packet(0x82, 0x60, &[0u8; 7])).is_none());
}

#[test]
fn test_short_packet_is_rejected() {
    assert!(RtpHeader::parse(&[]).is_none());
    assert!(RtpHeader::parse(&[0x80, 0x60, 0x00]).is_none());
    assert!(RtpHeader::parse(&packet(0x80, 0x60, &[])[..RTP_FIXED_HEADER_LEN - 1]).is_none());
}

#[test]
fn test_wrong_version_is_rejected() {
    assert!(RtpHeader::parse(&packet(0x40, 0x60, b"x")).is_none());
    assert!(RtpHeader::parse(&packet(0x00, 0x60, b"x")).is_none());
    assert!(RtpHeader::parse(b"hello, this is not rtp").is_none());
}

#[test]
fn test_rtcp_detection() {
    // Sender report (200) and BYE (203)
    assert!(RtpHeader::parse(&packet(0x80, 200, &[])).unwrap().is_rtcp());
    assert!(RtpHeader::parse(&packet(0x81, 203, &[0u8; 4])).unwrap().is_rtcp());
    assert!(!RtpHeader::parse(&packet(0x80, 0x7f, &[])).unwrap().is_rtcp());
}
