// event_tests.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use super::event::*;

#[test]
fn test_pipeline_state_display() {
    assert_eq!(PipelineState::VoidPending.to_string(), "void_pending");
    assert_eq!(PipelineState::Null.to_string(), "null");
    assert_eq!(PipelineState::Ready.to_string(), "ready");
    assert_eq!(PipelineState::Paused.to_string(), "paused");
    assert_eq!(PipelineState::Playing.to_string(), "playing");
}

#[test]
fn test_pipeline_state_from_str() {
    assert_eq!(
        "voidpending".parse::<PipelineState>().unwrap(),
        PipelineState::VoidPending
    );
    assert_eq!("null".parse::<PipelineState>().unwrap(), PipelineState::Null);
    assert_eq!(
        "PLAYING".parse::<PipelineState>().unwrap(),
        PipelineState::Playing
    );
    assert!("stopped".parse::<PipelineState>().is_err());
    assert!("".parse::<PipelineState>().is_err());
}

#[test]
fn test_pipeline_state_gstreamer_conversion() {
    for state in [
        PipelineState::VoidPending,
        PipelineState::Null,
        PipelineState::Ready,
        PipelineState::Paused,
        PipelineState::Playing,
    ] {
        let gst_state: gstreamer::State = state.into();
        assert_eq!(PipelineState::from(gst_state), state);
    }
    assert_eq!(
        PipelineState::from(gstreamer::State::Playing),
        PipelineState::Playing
    );
}

#[test]
fn test_event_json_shape() {
    let event = PipelineEvent::Eos {
        pipeline_id: "pt-96".to_string(),
    };
    assert_eq!(
        serde_json::to_string(&event).unwrap(),
        r#"{"event":"eos","data":{"pipeline_id":"pt-96"}}"#
    );

    let event = PipelineEvent::StateChanged {
        pipeline_id: "pt-96".to_string(),
        old_state: PipelineState::VoidPending,
        new_state: PipelineState::Playing,
    };
    let value: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "state_changed");
    assert_eq!(value["data"]["old_state"], "void_pending");
    assert_eq!(value["data"]["new_state"], "playing");
}

#[test]
fn test_error_event_json_keeps_missing_fields_null() {
    let event = PipelineEvent::Error {
        pipeline_id: "catch-all".to_string(),
        source: None,
        message: "boom".to_string(),
        debug: None,
    };
    let value: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "error");
    assert!(value["data"]["source"].is_null());
    assert!(value["data"]["debug"].is_null());

    let parsed: PipelineEvent = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, event);
}

#[test]
fn test_event_pipeline_id() {
    let events = [
        PipelineEvent::Eos {
            pipeline_id: "a".to_string(),
        },
        PipelineEvent::Warning {
            pipeline_id: "a".to_string(),
            source: Some("src".to_string()),
            message: "late".to_string(),
        },
        PipelineEvent::PipelineAdded {
            pipeline_id: "a".to_string(),
            description: "appsrc name=src ! fakesink".to_string(),
        },
        PipelineEvent::PipelineRemoved {
            pipeline_id: "a".to_string(),
        },
    ];
    for event in &events {
        assert_eq!(event.pipeline_id(), "a");
    }
}

#[tokio::test]
async fn test_event_channel_broadcasts_to_subscribers() {
    let (tx, mut rx1) = create_event_channel();
    let mut rx2 = tx.subscribe();

    tx.send(PipelineEvent::PipelineRemoved {
        pipeline_id: "pt-0".to_string(),
    })
    .unwrap();

    assert_eq!(rx1.recv().await.unwrap().pipeline_id(), "pt-0");
    assert_eq!(rx2.recv().await.unwrap().pipeline_id(), "pt-0");
}
