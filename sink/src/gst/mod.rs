// mod.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod bus;
pub mod codec;
pub mod event;
pub mod mainloop;
pub mod manager;
pub mod pipeline;

pub use bus::{handle_message, BusAction, TerminalReason, TerminationPolicy};
pub use codec::{Codec, MediaKind, SinkConfig};
pub use event::{create_event_channel, EventReceiver, EventSender, PipelineEvent, PipelineState};
pub use mainloop::{is_main_loop_running, quit_main_loop, run_main_loop, start_main_loop};
pub use manager::{PipelineManager, TrackInfo};
pub use pipeline::Pipeline;

/// Name of the app-source element buffers are pushed into
pub const APP_SOURCE_NAME: &str = "src";

/// Highest RTP payload type (7-bit field)
pub const MAX_PAYLOAD_TYPE: u8 = 127;



#[cfg(test)]
mod event_tests;
