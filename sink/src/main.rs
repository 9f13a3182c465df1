// main.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rtpsink::config::Config;
use rtpsink::gst::{create_event_channel, mainloop, PipelineEvent, PipelineManager};
use rtpsink::rtp::RtpReceiver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("rtpsink=info".parse()?)
                .add_directive("gst_rtp_sink=info".parse()?),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    let addr = config.socket_addr()?;

    gstreamer::init()?;
    info!("GStreamer initialized");

    // Bus watches are dispatched from here
    let main_loop_thread = mainloop::start_main_loop()?;

    let (event_tx, _) = create_event_channel();

    // Event printer / logger
    let mut event_rx = event_tx.subscribe();
    let events_json = config.events_json;
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    if events_json {
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{}", line),
                            Err(e) => warn!("Failed to serialize event: {}", e),
                        }
                    }
                    if let PipelineEvent::StateChanged {
                        pipeline_id,
                        new_state,
                        ..
                    } = &event
                    {
                        info!("Pipeline '{}' is now {}", pipeline_id, new_state);
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Event printer lagged by {} events", n);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let manager = Arc::new(PipelineManager::new(event_tx.clone(), config.policy()));

    let sinks = config.sinks();
    for track in &config.tracks {
        manager
            .add_track(track.payload_type, track.codec, &sinks)
            .await?;
    }
    if let Some(ref description) = config.pipeline {
        manager.set_catch_all(description).await?;
    }

    for track in manager.list_tracks().await {
        info!("Track '{}': {}", track.id, track.description);
    }

    let failed = manager.start_all().await;
    if !failed.is_empty() {
        error!("Failed to start pipeline(s): {}", failed.join(", "));
        manager.shutdown().await;
        mainloop::quit_main_loop();
        std::process::exit(1);
    }

    let mut receiver = RtpReceiver::bind(addr, Arc::clone(&manager)).await?;

    // Register signal handlers before entering select! (registration is synchronous and fallible)
    #[cfg(unix)]
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    let shutdown_signal = async {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = sigint.recv() => info!("Received SIGINT"),
                _ = sigterm.recv() => info!("Received SIGTERM"),
            }
        }
        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C");
        }
    };

    let main_loop_done = tokio::task::spawn_blocking(move || main_loop_thread.join());

    info!("gst-rtp-sink started. Press Ctrl+C to stop.");

    tokio::select! {
        _ = shutdown_signal => {}
        result = receiver.run() => {
            if let Err(e) = result {
                error!("RTP receiver stopped: {}", e);
            }
        }
        _ = main_loop_done => {
            info!("Main loop exited");
        }
    }

    info!("Shutting down...");

    manager.shutdown().await;
    mainloop::quit_main_loop();

    let stats = receiver.stats();
    info!(
        "Received {} packets ({} bytes): {} pushed, {} dropped, {} unrouted, {} push failures",
        stats.packets,
        stats.bytes,
        stats.pushed,
        stats.dropped,
        stats.unrouted,
        stats.push_failures
    );

    info!("Shutdown complete");
    Ok(())
}
