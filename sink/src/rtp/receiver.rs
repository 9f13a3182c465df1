// receiver.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use super::header::RtpHeader;
use super::MAX_DATAGRAM_SIZE;
use crate::error::{Result, RtpSinkError};
use crate::gst::PipelineManager;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub packets: u64,
    pub bytes: u64,
    pub pushed: u64,
    /// Datagrams that are not RTP, including multiplexed RTCP
    pub dropped: u64,
    /// RTP packets whose payload type has no pipeline
    pub unrouted: u64,
    pub push_failures: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutcome {
    Pushed,
    NotRtp,
    Rtcp,
    Unrouted,
    PushFailed,
}

/// Reads RTP datagrams from a UDP socket and pushes each packet, unchanged,
/// into the pipeline routed for its payload type.
pub struct RtpReceiver {
    socket: UdpSocket,
    manager: Arc<PipelineManager>,
    stats: ReceiverStats,
    /// Payload types already reported, to log each problem once
    reported: HashSet<u8>,
}

impl RtpReceiver {
    pub async fn bind(addr: SocketAddr, manager: Arc<PipelineManager>) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        info!("RTP receiver listening on udp://{}", socket.local_addr()?);
        Ok(Self::from_socket(socket, manager))
    }

    pub fn from_socket(socket: UdpSocket, manager: Arc<PipelineManager>) -> Self {
        Self {
            socket,
            manager,
            stats: ReceiverStats::default(),
            reported: HashSet::new(),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    pub async fn handle_packet(&mut self, packet: &[u8]) -> PacketOutcome {
        self.stats.packets += 1;
        self.stats.bytes += packet.len() as u64;

        let header = match RtpHeader::parse(packet) {
            Some(header) => header,
            None => {
                self.stats.dropped += 1;
                debug!("Dropping {} byte datagram: not RTP", packet.len());
                return PacketOutcome::NotRtp;
            }
        };

        if header.is_rtcp() {
            self.stats.dropped += 1;
            return PacketOutcome::Rtcp;
        }

        let pt = header.payload_type;
        match self.manager.push(pt, packet).await {
            Ok(()) => {
                self.stats.pushed += 1;
                PacketOutcome::Pushed
            }
            Err(RtpSinkError::TrackNotFound(_)) => {
                self.stats.unrouted += 1;
                if self.reported.insert(pt) {
                    warn!("No pipeline for payload type {} (ssrc {:#010x})", pt, header.ssrc);
                }
                PacketOutcome::Unrouted
            }
            Err(e) => {
                self.stats.push_failures += 1;
                if self.reported.insert(pt) {
                    warn!("Push failed for payload type {}: {}", pt, e);
                } else {
                    debug!("Push failed for payload type {}: {}", pt, e);
                }
                PacketOutcome::PushFailed
            }
        }
    }

    /// Receive until the socket fails. Cancel the future to stop.
    pub async fn run(&mut self) -> Result<()> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        loop {
            let (len, peer) = self.socket.recv_from(&mut buf).await?;
            if self.stats.packets == 0 {
                info!("First packet from {}", peer);
            }
            self.handle_packet(&buf[..len]).await;
        }
    }
}
