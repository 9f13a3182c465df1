// manager.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::MAX_PAYLOAD_TYPE;
use crate::error::{Result, RtpSinkError};
use crate::gst::bus::TerminationPolicy;
use crate::gst::codec::{Codec, SinkConfig};
use crate::gst::event::{EventSender, PipelineEvent, PipelineState};
use crate::gst::pipeline::Pipeline;

/// Pipeline id of the catch-all route
pub const CATCH_ALL_ID: &str = "catch-all";

pub fn track_id(payload_type: u8) -> String {
    format!("pt-{}", payload_type)
}

#[derive(Debug, Clone)]
pub struct TrackInfo {
    pub id: String,
    /// None for the catch-all pipeline
    pub payload_type: Option<u8>,
    pub description: String,
    pub state: PipelineState,
    pub buffers_pushed: u64,
}

impl TrackInfo {
    fn new(payload_type: Option<u8>, pipeline: &Pipeline) -> Self {
        Self {
            id: pipeline.id().to_string(),
            payload_type,
            description: pipeline.description().to_string(),
            state: pipeline.state(),
            buffers_pushed: pipeline.buffers_pushed(),
        }
    }
}

/// One pipeline per RTP payload type, plus an optional pipeline receiving every
/// packet no track claims.
pub struct PipelineManager {
    tracks: RwLock<HashMap<u8, Arc<Pipeline>>>,
    catch_all: RwLock<Option<Arc<Pipeline>>>,
    event_tx: EventSender,
    policy: TerminationPolicy,
    /// Set by `start_all`; pipelines added afterwards start immediately
    started: AtomicBool,
}

impl PipelineManager {
    pub fn new(event_tx: EventSender, policy: TerminationPolicy) -> Self {
        Self {
            tracks: RwLock::new(HashMap::new()),
            catch_all: RwLock::new(None),
            event_tx,
            policy,
            started: AtomicBool::new(false),
        }
    }

    pub fn policy(&self) -> TerminationPolicy {
        self.policy
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Start a pipeline added after `start_all`, so it does not sit in NULL.
    fn start_if_running(&self, pipeline: &Pipeline) -> Result<()> {
        if self.is_started() {
            pipeline.start(self.policy, Some(self.event_tx.clone()))?;
        }
        Ok(())
    }

    fn notify(&self, event: PipelineEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("Failed to send pipeline event: no receivers");
        }
    }

    /// Create the pipeline for `codec` and route `payload_type` to it.
    pub async fn add_track(
        &self,
        payload_type: u8,
        codec: Codec,
        sinks: &SinkConfig,
    ) -> Result<String> {
        let description = codec.pipeline_description(payload_type, sinks);
        self.add_pipeline(payload_type, &description).await
    }

    /// Route `payload_type` to a pipeline built from a custom description.
    pub async fn add_pipeline(&self, payload_type: u8, description: &str) -> Result<String> {
        if payload_type > MAX_PAYLOAD_TYPE {
            return Err(RtpSinkError::InvalidTrack(format!(
                "payload type {} out of range (0-{})",
                payload_type, MAX_PAYLOAD_TYPE
            )));
        }

        // Fail before parsing, a parsed pipeline is not free
        if self.tracks.read().await.contains_key(&payload_type) {
            return Err(RtpSinkError::TrackExists(payload_type));
        }

        let id = track_id(payload_type);
        let pipeline = Arc::new(Pipeline::create(id.clone(), description)?);
        self.start_if_running(&pipeline)?;

        {
            let mut tracks = self.tracks.write().await;
            if tracks.contains_key(&payload_type) {
                return Err(RtpSinkError::TrackExists(payload_type));
            }
            tracks.insert(payload_type, pipeline);
        }

        info!("Added track '{}' for payload type {}", id, payload_type);
        self.notify(PipelineEvent::PipelineAdded {
            pipeline_id: id.clone(),
            description: description.to_string(),
        });

        Ok(id)
    }

    /// Install the pipeline that receives packets of every unrouted payload type.
    /// Replaces (and stops) a previous catch-all pipeline.
    pub async fn set_catch_all(&self, description: &str) -> Result<String> {
        let pipeline = Arc::new(Pipeline::create(CATCH_ALL_ID, description)?);
        self.start_if_running(&pipeline)?;

        let previous = self.catch_all.write().await.replace(pipeline);
        if let Some(old) = previous {
            if let Err(e) = old.stop() {
                warn!("Failed to stop replaced catch-all pipeline: {}", e);
            }
            self.notify(PipelineEvent::PipelineRemoved {
                pipeline_id: CATCH_ALL_ID.to_string(),
            });
        }

        info!("Installed catch-all pipeline: {}", description);
        self.notify(PipelineEvent::PipelineAdded {
            pipeline_id: CATCH_ALL_ID.to_string(),
            description: description.to_string(),
        });

        Ok(CATCH_ALL_ID.to_string())
    }

    async fn all_pipelines(&self) -> Vec<Arc<Pipeline>> {
        let mut pipelines: Vec<Arc<Pipeline>> =
            self.tracks.read().await.values().cloned().collect();
        if let Some(catch_all) = self.catch_all.read().await.as_ref() {
            pipelines.push(Arc::clone(catch_all));
        }
        pipelines
    }

    /// Start every pipeline. Returns the ids that failed to start.
    pub async fn start_all(&self) -> Vec<String> {
        self.started.store(true, Ordering::Release);
        let mut failed = Vec::new();
        for pipeline in self.all_pipelines().await {
            if let Err(e) = pipeline.start(self.policy, Some(self.event_tx.clone())) {
                warn!("Failed to start pipeline '{}': {}", pipeline.id(), e);
                failed.push(pipeline.id().to_string());
            }
        }
        failed
    }

    /// Find the pipeline for `payload_type`, falling back to the catch-all.
    pub async fn route(&self, payload_type: u8) -> Option<Arc<Pipeline>> {
        if let Some(pipeline) = self.tracks.read().await.get(&payload_type) {
            return Some(Arc::clone(pipeline));
        }
        self.catch_all.read().await.clone()
    }

    pub async fn push(&self, payload_type: u8, data: &[u8]) -> Result<()> {
        match self.route(payload_type).await {
            Some(pipeline) => pipeline.push(data),
            None => Err(RtpSinkError::TrackNotFound(payload_type)),
        }
    }

    pub async fn remove_track(&self, payload_type: u8) -> Result<()> {
        let pipeline = self
            .tracks
            .write()
            .await
            .remove(&payload_type)
            .ok_or(RtpSinkError::TrackNotFound(payload_type))?;

        pipeline.stop()?;
        info!("Removed track '{}'", pipeline.id());
        self.notify(PipelineEvent::PipelineRemoved {
            pipeline_id: pipeline.id().to_string(),
        });
        Ok(())
    }

    pub async fn track_count(&self) -> usize {
        self.tracks.read().await.len()
    }

    pub async fn has_catch_all(&self) -> bool {
        self.catch_all.read().await.is_some()
    }

    /// Tracks sorted by payload type, catch-all last.
    pub async fn list_tracks(&self) -> Vec<TrackInfo> {
        let mut infos: Vec<TrackInfo> = {
            let tracks = self.tracks.read().await;
            tracks
                .iter()
                .map(|(pt, pipeline)| TrackInfo::new(Some(*pt), pipeline))
                .collect()
        };
        infos.sort_by_key(|info| info.payload_type);

        if let Some(catch_all) = self.catch_all.read().await.as_ref() {
            infos.push(TrackInfo::new(None, catch_all));
        }
        infos
    }

    /// Stop and drop every pipeline.
    pub async fn shutdown(&self) {
        self.started.store(false, Ordering::Release);
        let mut pipelines: Vec<Arc<Pipeline>> = {
            let mut tracks = self.tracks.write().await;
            tracks.drain().map(|(_, p)| p).collect()
        };
        if let Some(catch_all) = self.catch_all.write().await.take() {
            pipelines.push(catch_all);
        }

        for pipeline in pipelines {
            if let Err(e) = pipeline.stop() {
                warn!("Failed to stop pipeline '{}': {}", pipeline.id(), e);
            }
            info!("Stopped pipeline '{}' during shutdown", pipeline.id());
            self.notify(PipelineEvent::PipelineRemoved {
                pipeline_id: pipeline.id().to_string(),
            });
        }
    }
}
