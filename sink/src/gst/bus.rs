// bus.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use gstreamer::prelude::*;
use gstreamer::{self as gst, glib};
use tracing::{debug, error, info, warn};

use crate::gst::event::{EventSender, PipelineEvent, PipelineState};
use crate::gst::mainloop;

/// Process exit code used when a pipeline terminates under [`TerminationPolicy::ExitProcess`]
pub const EXIT_CODE_TERMINATED: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    Eos,
    Error,
}

impl std::fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalReason::Eos => f.write_str("end of stream"),
            TerminalReason::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusAction {
    Continue,
    Terminate(TerminalReason),
}

/// What to do once a pipeline reports end-of-stream or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationPolicy {
    /// Exit the whole process with [`EXIT_CODE_TERMINATED`]
    #[default]
    ExitProcess,
    /// Quit the global main loop and let the host shut down
    QuitMainLoop,
    /// Only publish the event
    Notify,
}

impl TerminationPolicy {
    pub fn apply(self, pipeline_id: &str, reason: TerminalReason) {
        match self {
            TerminationPolicy::ExitProcess => {
                error!(
                    "Pipeline '{}' terminated ({}), exiting with code {}",
                    pipeline_id, reason, EXIT_CODE_TERMINATED
                );
                std::process::exit(EXIT_CODE_TERMINATED);
            }
            TerminationPolicy::QuitMainLoop => {
                info!("Pipeline '{}' terminated ({}), quitting main loop", pipeline_id, reason);
                if !mainloop::quit_main_loop() {
                    warn!("No main loop registered to quit");
                }
            }
            TerminationPolicy::Notify => {
                debug!("Pipeline '{}' terminated ({})", pipeline_id, reason);
            }
        }
    }
}

fn publish(events: Option<&EventSender>, event: PipelineEvent) {
    if let Some(tx) = events {
        if tx.send(event).is_err() {
            debug!("Pipeline event dropped: no receivers");
        }
    }
}

/// Classify a bus message, log it and publish the matching event.
pub fn handle_message(
    pipeline_id: &str,
    msg: &gst::Message,
    events: Option<&EventSender>,
) -> BusAction {
    let source = msg.src().map(|s| s.name().to_string());

    match msg.view() {
        gst::MessageView::Eos(_) => {
            info!("Pipeline '{}': End of stream", pipeline_id);
            publish(
                events,
                PipelineEvent::Eos {
                    pipeline_id: pipeline_id.to_string(),
                },
            );
            BusAction::Terminate(TerminalReason::Eos)
        }
        gst::MessageView::Error(err) => {
            let message = err.error().message().to_string();
            let debug_info = err.debug().map(|d| d.to_string());
            error!(
                "Pipeline '{}': ERROR from element {}: {}",
                pipeline_id,
                source.as_deref().unwrap_or("unknown"),
                message
            );
            error!(
                "Pipeline '{}': Debugging info: {}",
                pipeline_id,
                debug_info.as_deref().unwrap_or("none")
            );
            publish(
                events,
                PipelineEvent::Error {
                    pipeline_id: pipeline_id.to_string(),
                    source,
                    message,
                    debug: debug_info,
                },
            );
            BusAction::Terminate(TerminalReason::Error)
        }
        gst::MessageView::Warning(warning) => {
            let message = warning.error().message().to_string();
            warn!(
                "Pipeline '{}': warning from element {}: {} ({})",
                pipeline_id,
                source.as_deref().unwrap_or("unknown"),
                message,
                warning
                    .debug()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            publish(
                events,
                PipelineEvent::Warning {
                    pipeline_id: pipeline_id.to_string(),
                    source,
                    message,
                },
            );
            BusAction::Continue
        }
        gst::MessageView::StateChanged(state_changed) => {
            // Only the top-level pipeline has no parent
            if msg.src().is_some_and(|s| s.parent().is_none()) {
                let old = PipelineState::from(state_changed.old());
                let new = PipelineState::from(state_changed.current());
                debug!("Pipeline '{}' state changed: {} -> {}", pipeline_id, old, new);
                publish(
                    events,
                    PipelineEvent::StateChanged {
                        pipeline_id: pipeline_id.to_string(),
                        old_state: old,
                        new_state: new,
                    },
                );
            }
            BusAction::Continue
        }
        _ => BusAction::Continue,
    }
}

/// Build the bus watch callback for a pipeline. The watch is never removed by
/// the callback itself, termination is left to `policy`.
pub(crate) fn watch(
    pipeline_id: String,
    policy: TerminationPolicy,
    events: Option<EventSender>,
) -> impl FnMut(&gst::Bus, &gst::Message) -> glib::ControlFlow + Send + 'static {
    move |_bus, msg| {
        if let BusAction::Terminate(reason) = handle_message(&pipeline_id, msg, events.as_ref()) {
            policy.apply(&pipeline_id, reason);
        }
        glib::ControlFlow::Continue
    }
}
