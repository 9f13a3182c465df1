// error.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RtpSinkError {
    #[error("GStreamer error: {0}")]
    GStreamer(String),

    #[error("Invalid pipeline description: {0}")]
    InvalidPipeline(String),

    #[error("State change failed: {0}")]
    StateChangeFailed(String),

    #[error("Pipeline '{0}' has no app source named 'src'")]
    AppSourceNotFound(String),

    #[error("Buffer push failed: {0}")]
    Flow(String),

    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    #[error("Invalid track specification: {0}")]
    InvalidTrack(String),

    #[error("A pipeline is already registered for payload type {0}")]
    TrackExists(u8),

    #[error("No pipeline for payload type {0}")]
    TrackNotFound(u8),

    #[error("A main loop is already running")]
    MainLoopRunning,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<gstreamer::glib::Error> for RtpSinkError {
    fn from(err: gstreamer::glib::Error) -> Self {
        RtpSinkError::GStreamer(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RtpSinkError>;
