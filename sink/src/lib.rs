// lib.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod config;
pub mod error;
pub mod gst;
pub mod rtp;

#[cfg(test)]
mod config_tests;

pub use error::{Result, RtpSinkError};
pub use gst::{
    create_event_channel, Codec, Pipeline, PipelineEvent, PipelineManager, PipelineState,
    SinkConfig, TerminationPolicy,
};
pub use rtp::{ReceiverStats, RtpHeader, RtpReceiver};
