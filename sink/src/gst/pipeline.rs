// pipeline.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use gstreamer::prelude::*;
use gstreamer as gst;
use gstreamer_app::AppSrc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{Result, RtpSinkError};
use crate::gst::bus::{self, TerminationPolicy};
use crate::gst::event::{EventSender, PipelineState};
use crate::gst::APP_SOURCE_NAME;

/// Maximum length for pipeline descriptions to prevent memory exhaustion
pub const MAX_PIPELINE_DESCRIPTION_LENGTH: usize = 64 * 1024; // 64KB

pub struct Pipeline {
    id: String,
    description: String,
    pipeline: gst::Pipeline,
    /// The `src` element, when the description has one and it is an appsrc
    app_src: Option<AppSrc>,
    bus_watch: Mutex<Option<gst::bus::BusWatchGuard>>,
    buffers_pushed: AtomicU64,
}

impl Pipeline {
    /// Parse `description` into a pipeline. GStreamer is initialized on first use.
    pub fn create(id: impl Into<String>, description: &str) -> Result<Self> {
        let id = id.into();

        if description.trim().is_empty() {
            return Err(RtpSinkError::InvalidPipeline(
                "Pipeline description cannot be empty".to_string(),
            ));
        }

        if description.len() > MAX_PIPELINE_DESCRIPTION_LENGTH {
            return Err(RtpSinkError::InvalidPipeline(format!(
                "Pipeline description too long: {} bytes (max: {} bytes)",
                description.len(),
                MAX_PIPELINE_DESCRIPTION_LENGTH
            )));
        }

        gst::init()?;

        let pipeline = gst::parse::launch(description)
            .map_err(|e| RtpSinkError::InvalidPipeline(e.to_string()))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| RtpSinkError::InvalidPipeline("Not a pipeline".to_string()))?;

        let app_src = match pipeline.by_name(APP_SOURCE_NAME) {
            Some(element) => match element.downcast::<AppSrc>() {
                Ok(app_src) => Some(app_src),
                Err(element) => {
                    warn!(
                        "Pipeline '{}': element '{}' is a {}, not an appsrc",
                        id,
                        APP_SOURCE_NAME,
                        element.type_().name()
                    );
                    None
                }
            },
            None => {
                debug!("Pipeline '{}' has no '{}' element", id, APP_SOURCE_NAME);
                None
            }
        };

        info!("Created pipeline '{}': {}", id, description);

        Ok(Self {
            id,
            description: description.to_string(),
            pipeline,
            app_src,
            bus_watch: Mutex::new(None),
            buffers_pushed: AtomicU64::new(0),
        })
    }

    /// Install the bus watch (first call only) and set the pipeline to PLAYING.
    ///
    /// The watch is dispatched from the default main context, see
    /// [`crate::gst::mainloop`].
    pub fn start(&self, policy: TerminationPolicy, events: Option<EventSender>) -> Result<()> {
        {
            let mut bus_watch = self.bus_watch.lock().unwrap_or_else(|e| e.into_inner());
            if bus_watch.is_none() {
                let pipeline_bus = self.pipeline.bus().ok_or_else(|| {
                    RtpSinkError::GStreamer(format!("Pipeline '{}' has no bus", self.id))
                })?;
                let guard = pipeline_bus
                    .add_watch(bus::watch(self.id.clone(), policy, events))
                    .map_err(|e| RtpSinkError::GStreamer(e.to_string()))?;
                *bus_watch = Some(guard);
            }
        }

        self.set_state(PipelineState::Playing)
    }

    pub fn stop(&self) -> Result<()> {
        self.set_state(PipelineState::Null)
    }

    /// Request a state change without waiting for asynchronous completion.
    pub fn set_state(&self, state: PipelineState) -> Result<()> {
        let gst_state: gst::State = state.into();
        let success = self.pipeline.set_state(gst_state).map_err(|_| {
            RtpSinkError::StateChangeFailed(format!(
                "Failed to change state to {} for pipeline '{}'",
                state, self.id
            ))
        })?;

        match success {
            gst::StateChangeSuccess::Async => {
                info!("Pipeline '{}' state change to {} in progress", self.id, state)
            }
            gst::StateChangeSuccess::Success | gst::StateChangeSuccess::NoPreroll => {
                info!("Pipeline '{}' state set to {}", self.id, state)
            }
        }
        Ok(())
    }

    /// Copy `data` into a new buffer and push it into the `src` app source.
    pub fn push(&self, data: &[u8]) -> Result<()> {
        let app_src = self
            .app_src
            .as_ref()
            .ok_or_else(|| RtpSinkError::AppSourceNotFound(self.id.clone()))?;

        let buffer = gst::Buffer::from_slice(data.to_vec());

        match app_src.push_buffer(buffer) {
            Ok(_) => {
                let count = self.buffers_pushed.fetch_add(1, Ordering::Relaxed);
                if count % 1000 == 0 {
                    debug!(pipeline = %self.id, buffers = count + 1, "Buffers pushed");
                }
                Ok(())
            }
            Err(e) => Err(RtpSinkError::Flow(format!(
                "pipeline '{}': {:?}",
                self.id, e
            ))),
        }
    }

    /// Signal end-of-stream on the `src` app source. The bus reports EOS once
    /// every queued buffer has reached the sinks.
    pub fn end_of_stream(&self) -> Result<()> {
        let app_src = self
            .app_src
            .as_ref()
            .ok_or_else(|| RtpSinkError::AppSourceNotFound(self.id.clone()))?;

        app_src
            .end_of_stream()
            .map(|_| ())
            .map_err(|e| RtpSinkError::Flow(format!("pipeline '{}': {:?}", self.id, e)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_app_source(&self) -> bool {
        self.app_src.is_some()
    }

    pub fn buffers_pushed(&self) -> u64 {
        self.buffers_pushed.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> PipelineState {
        let (_result, current, _pending) = self.pipeline.state(gst::ClockTime::ZERO);
        PipelineState::from(current)
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        debug!("Dropping pipeline '{}'", self.id);

        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            error!("Failed to set pipeline '{}' to Null on drop: {:?}", self.id, e);
        }

        // Removes the watch from the main context
        self.bus_watch
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }
}
