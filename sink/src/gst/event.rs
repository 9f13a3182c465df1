// event.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// No pending state (transition target not set)
    VoidPending,
    Null,
    Ready,
    Paused,
    Playing,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineState::VoidPending => "void_pending",
            PipelineState::Null => "null",
            PipelineState::Ready => "ready",
            PipelineState::Paused => "paused",
            PipelineState::Playing => "playing",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for PipelineState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "void_pending" | "voidpending" => Ok(PipelineState::VoidPending),
            "null" => Ok(PipelineState::Null),
            "ready" => Ok(PipelineState::Ready),
            "paused" => Ok(PipelineState::Paused),
            "playing" => Ok(PipelineState::Playing),
            _ => Err(format!(
                "Invalid state '{}'. Valid values: null, ready, paused, playing",
                s
            )),
        }
    }
}

impl From<gstreamer::State> for PipelineState {
    fn from(state: gstreamer::State) -> Self {
        match state {
            gstreamer::State::VoidPending => PipelineState::VoidPending,
            gstreamer::State::Null => PipelineState::Null,
            gstreamer::State::Ready => PipelineState::Ready,
            gstreamer::State::Paused => PipelineState::Paused,
            gstreamer::State::Playing => PipelineState::Playing,
        }
    }
}

impl From<PipelineState> for gstreamer::State {
    fn from(state: PipelineState) -> Self {
        match state {
            PipelineState::VoidPending => gstreamer::State::VoidPending,
            PipelineState::Null => gstreamer::State::Null,
            PipelineState::Ready => gstreamer::State::Ready,
            PipelineState::Paused => gstreamer::State::Paused,
            PipelineState::Playing => gstreamer::State::Playing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PipelineEvent {
    #[serde(rename = "state_changed")]
    StateChanged {
        pipeline_id: String,
        old_state: PipelineState,
        new_state: PipelineState,
    },
    #[serde(rename = "error")]
    Error {
        pipeline_id: String,
        source: Option<String>,
        message: String,
        debug: Option<String>,
    },
    #[serde(rename = "warning")]
    Warning {
        pipeline_id: String,
        source: Option<String>,
        message: String,
    },
    #[serde(rename = "eos")]
    Eos { pipeline_id: String },
    #[serde(rename = "pipeline_added")]
    PipelineAdded {
        pipeline_id: String,
        description: String,
    },
    #[serde(rename = "pipeline_removed")]
    PipelineRemoved { pipeline_id: String },
}

impl PipelineEvent {
    pub fn pipeline_id(&self) -> &str {
        match self {
            PipelineEvent::StateChanged { pipeline_id, .. }
            | PipelineEvent::Error { pipeline_id, .. }
            | PipelineEvent::Warning { pipeline_id, .. }
            | PipelineEvent::Eos { pipeline_id }
            | PipelineEvent::PipelineAdded { pipeline_id, .. }
            | PipelineEvent::PipelineRemoved { pipeline_id } => pipeline_id,
        }
    }
}

pub type EventSender = tokio::sync::broadcast::Sender<PipelineEvent>;
pub type EventReceiver = tokio::sync::broadcast::Receiver<PipelineEvent>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::broadcast::channel(256)
}
