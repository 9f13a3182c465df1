// mod.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod header;
pub mod receiver;

pub use header::RtpHeader;
pub use receiver::{ReceiverStats, RtpReceiver};

/// Largest datagram read from the socket (maximum UDP payload), so loopback
/// and jumbo-frame packets are never truncated
pub const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Default UDP port for RTP ingest
pub const DEFAULT_RTP_PORT: u16 = 5004;

/// Default bind address for RTP ingest
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

#[cfg(test)]
mod header_tests;
