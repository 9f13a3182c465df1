// config.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};

use crate::error::{Result, RtpSinkError};
use crate::gst::codec::{Codec, SinkConfig, DEFAULT_AUDIO_SINK, DEFAULT_VIDEO_SINK};
use crate::gst::{TerminationPolicy, MAX_PAYLOAD_TYPE};
use crate::rtp::{DEFAULT_BIND_ADDRESS, DEFAULT_RTP_PORT};

/// Route one RTP payload type to a generated pipeline, written `PT=CODEC`
/// (e.g. `96=vp8`, `111=opus`, `102=video/H264`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSpec {
    pub payload_type: u8,
    pub codec: Codec,
}

impl std::str::FromStr for TrackSpec {
    type Err = RtpSinkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (pt, codec) = s.split_once(['=', ':']).ok_or_else(|| {
            RtpSinkError::InvalidTrack(format!("'{}' is not of the form PT=CODEC", s))
        })?;

        let payload_type: u8 = pt
            .trim()
            .parse()
            .map_err(|_| RtpSinkError::InvalidTrack(format!("invalid payload type '{}'", pt)))?;
        if payload_type > MAX_PAYLOAD_TYPE {
            return Err(RtpSinkError::InvalidTrack(format!(
                "payload type {} out of range (0-{})",
                payload_type, MAX_PAYLOAD_TYPE
            )));
        }

        Ok(Self {
            payload_type,
            codec: codec.parse()?,
        })
    }
}

/// What happens when a pipeline reaches end-of-stream or fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OnTerminal {
    /// Exit the process with status 1
    #[default]
    Exit,
    /// Stop receiving and shut down cleanly
    Quit,
    /// Log and keep running
    Ignore,
}

impl From<OnTerminal> for TerminationPolicy {
    fn from(value: OnTerminal) -> Self {
        match value {
            OnTerminal::Exit => TerminationPolicy::ExitProcess,
            OnTerminal::Quit => TerminationPolicy::QuitMainLoop,
            OnTerminal::Ignore => TerminationPolicy::Notify,
        }
    }
}

/// Receive RTP over UDP and play it through GStreamer pipelines
#[derive(Parser, Debug, Clone)]
#[command(name = "gst-rtp-sink")]
#[command(author = "Stéphane Cerveau")]
#[command(version)]
#[command(about = "Push RTP packets into GStreamer pipelines")]
pub struct Config {
    /// UDP port to receive RTP on
    #[arg(short = 'P', long, default_value_t = DEFAULT_RTP_PORT, env = "RTPSINK_PORT")]
    pub port: u16,

    /// Bind address for the RTP socket
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS, env = "RTPSINK_BIND")]
    pub bind: String,

    /// Track to play, as PT=CODEC (vp8, vp9, h264, opus, g722). Repeatable.
    #[arg(short, long = "track")]
    pub tracks: Vec<TrackSpec>,

    /// Pipeline description receiving every packet no track claims.
    /// Must contain an appsrc named "src".
    #[arg(short, long)]
    pub pipeline: Option<String>,

    /// Sink element for video tracks
    #[arg(long, default_value = DEFAULT_VIDEO_SINK, env = "RTPSINK_VIDEO_SINK")]
    pub video_sink: String,

    /// Sink element for audio tracks
    #[arg(long, default_value = DEFAULT_AUDIO_SINK, env = "RTPSINK_AUDIO_SINK")]
    pub audio_sink: String,

    /// Behavior on end-of-stream or pipeline error
    #[arg(long, value_enum, default_value_t = OnTerminal::Exit)]
    pub on_terminal: OnTerminal,

    /// Print pipeline events as JSON lines on stdout
    #[arg(long)]
    pub events_json: bool,
}

impl Config {
    /// Bind address accepts IPv4 and IPv6 literals (`0.0.0.0`, `::`, `::1`).
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind.trim().parse().map_err(|e| {
            RtpSinkError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address '{}': {}", self.bind, e),
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn sinks(&self) -> SinkConfig {
        SinkConfig {
            video_sink: self.video_sink.clone(),
            audio_sink: self.audio_sink.clone(),
        }
    }

    pub fn policy(&self) -> TerminationPolicy {
        self.on_terminal.into()
    }

    /// At least one route is needed and payload types must be unique.
    pub fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() && self.pipeline.is_none() {
            return Err(RtpSinkError::InvalidTrack(
                "at least one --track or a --pipeline is required".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for track in &self.tracks {
            if !seen.insert(track.payload_type) {
                return Err(RtpSinkError::TrackExists(track.payload_type));
            }
        }
        Ok(())
    }
}
