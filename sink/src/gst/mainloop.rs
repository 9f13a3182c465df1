// mainloop.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

//! Process-wide GLib main loop.
//!
//! Bus watches are dispatched from the default main context, so something has
//! to run it. At most one loop is registered at a time; it can be quit from any
//! thread through [`quit_main_loop`].

use gstreamer::glib;
use std::sync::{Mutex, MutexGuard};
use std::thread::JoinHandle;
use tracing::{debug, info};

use crate::error::{Result, RtpSinkError};

static MAIN_LOOP: Mutex<Option<glib::MainLoop>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<glib::MainLoop>> {
    // The slot only holds a handle, a poisoned lock leaves it consistent
    MAIN_LOOP.lock().unwrap_or_else(|e| e.into_inner())
}

fn register() -> Result<glib::MainLoop> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(RtpSinkError::MainLoopRunning);
    }
    let main_loop = glib::MainLoop::new(None, false);
    *slot = Some(main_loop.clone());
    Ok(main_loop)
}

fn run_registered(main_loop: glib::MainLoop) {
    info!("Main loop running");
    main_loop.run();

    let mut slot = slot();
    if slot.as_ref().is_some_and(|l| *l == main_loop) {
        *slot = None;
    }
    info!("Main loop stopped");
}

/// Run the main loop on the calling thread until [`quit_main_loop`] is called.
pub fn run_main_loop() -> Result<()> {
    let main_loop = register()?;
    run_registered(main_loop);
    Ok(())
}

/// Register a main loop and run it on a dedicated thread.
pub fn start_main_loop() -> Result<JoinHandle<()>> {
    let main_loop = register()?;
    std::thread::Builder::new()
        .name("gst-main-loop".to_string())
        .spawn(move || run_registered(main_loop))
        .map_err(|e| {
            slot().take();
            RtpSinkError::Io(e)
        })
}

/// Quit the registered main loop. Returns false when none is registered.
pub fn quit_main_loop() -> bool {
    match slot().take() {
        Some(main_loop) => {
            debug!("Quitting main loop");
            main_loop.quit();
            // run() resets the quit flag, so a loop thread that has not reached
            // run() yet gets quit again from its first dispatch
            let _ = glib::idle_add_once(move || main_loop.quit());
            true
        }
        None => false,
    }
}

pub fn is_main_loop_running() -> bool {
    slot().is_some()
}
