// codec.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::error::RtpSinkError;

/// Live app source feeding RTP caps; timestamps are taken on push.
pub const APP_SOURCE_PREFIX: &str =
    "appsrc format=time is-live=true do-timestamp=true name=src ! application/x-rtp";

pub const DEFAULT_VIDEO_SINK: &str = "autovideosink";
pub const DEFAULT_AUDIO_SINK: &str = "autoaudiosink";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Vp8,
    Vp9,
    H264,
    Opus,
    G722,
}

impl Codec {
    pub fn kind(&self) -> MediaKind {
        match self {
            Codec::Vp8 | Codec::Vp9 | Codec::H264 => MediaKind::Video,
            Codec::Opus | Codec::G722 => MediaKind::Audio,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Vp8 => "vp8",
            Codec::Vp9 => "vp9",
            Codec::H264 => "h264",
            Codec::Opus => "opus",
            Codec::G722 => "g722",
        }
    }

    /// Caps fields and depayloader appended after the RTP caps of the app source.
    fn depayload_chain(&self, payload_type: u8) -> String {
        match self {
            Codec::Vp8 => format!(
                ", payload={}, encoding-name=VP8-DRAFT-IETF-01 ! rtpvp8depay",
                payload_type
            ),
            Codec::Opus => format!(
                ", payload={}, encoding-name=OPUS ! rtpopusdepay",
                payload_type
            ),
            Codec::Vp9 => " ! rtpvp9depay".to_string(),
            Codec::H264 => " ! rtph264depay".to_string(),
            Codec::G722 => " clock-rate=8000 ! rtpg722depay".to_string(),
        }
    }

    /// Full launch description for a track of this codec.
    pub fn pipeline_description(&self, payload_type: u8, sinks: &SinkConfig) -> String {
        let sink = match self.kind() {
            MediaKind::Video => &sinks.video_sink,
            MediaKind::Audio => &sinks.audio_sink,
        };
        format!(
            "{}{} ! decodebin ! {}",
            APP_SOURCE_PREFIX,
            self.depayload_chain(payload_type),
            sink
        )
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Codec {
    type Err = RtpSinkError;

    /// Accepts a bare codec name or a MIME type such as `video/VP8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit('/').next().unwrap_or(s).trim().to_lowercase();
        match name.as_str() {
            "vp8" => Ok(Codec::Vp8),
            "vp9" => Ok(Codec::Vp9),
            "h264" => Ok(Codec::H264),
            "opus" => Ok(Codec::Opus),
            "g722" => Ok(Codec::G722),
            _ => Err(RtpSinkError::UnsupportedCodec(s.to_string())),
        }
    }
}

/// Sink elements terminating generated pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub video_sink: String,
    pub audio_sink: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            video_sink: DEFAULT_VIDEO_SINK.to_string(),
            audio_sink: DEFAULT_AUDIO_SINK.to_string(),
        }
    }
}
