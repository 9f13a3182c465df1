// config_tests.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of GstRtpSink
//
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use std::net::SocketAddr;

use crate::config::*;
use crate::error::RtpSinkError;
use crate::gst::codec::{Codec, SinkConfig};
use crate::gst::TerminationPolicy;
use crate::rtp::{DEFAULT_BIND_ADDRESS, DEFAULT_RTP_PORT};

fn parse(args: &[&str]) -> Config {
    Config::try_parse_from(std::iter::once("gst-rtp-sink").chain(args.iter().copied()))
        .unwrap()
}

#[test]
fn test_track_spec_parsing() {
    let spec: TrackSpec = "96=vp8".parse().unwrap();
    assert_eq!(spec.payload_type, 96);
    assert_eq!(spec.codec, Codec::Vp8);

    let spec: TrackSpec = "111:audio/OPUS".parse().unwrap();
    assert_eq!(spec.payload_type, 111);
    assert_eq!(spec.codec, Codec::Opus);
}

#[test]
fn test_track_spec_invalid() {
    assert!(matches!(
        "96".parse::<TrackSpec>(),
        Err(RtpSinkError::InvalidTrack(_))
    ));
    assert!(matches!(
        "abc=vp8".parse::<TrackSpec>(),
        Err(RtpSinkError::InvalidTrack(_))
    ));
    assert!(matches!(
        "128=vp8".parse::<TrackSpec>(),
        Err(RtpSinkError::InvalidTrack(_))
    ));
    assert!(matches!(
        "96=theora".parse::<TrackSpec>(),
        Err(RtpSinkError::UnsupportedCodec(_))
    ));
}

#[test]
fn test_defaults() {
    let config = parse(&["--track", "96=vp8"]);
    assert_eq!(config.port, DEFAULT_RTP_PORT);
    assert_eq!(config.bind, DEFAULT_BIND_ADDRESS);
    assert_eq!(config.sinks(), SinkConfig::default());
    assert_eq!(config.policy(), TerminationPolicy::ExitProcess);
    assert!(!config.events_json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_multiple_tracks_and_overrides() {
    let config = parse(&[
        "-t",
        "96=vp8",
        "-t",
        "111=opus",
        "--video-sink",
        "fakesink",
        "--on-terminal",
        "quit",
        "-P",
        "6000",
    ]);
    assert_eq!(config.tracks.len(), 2);
    assert_eq!(config.sinks().video_sink, "fakesink");
    assert_eq!(config.policy(), TerminationPolicy::QuitMainLoop);
    assert_eq!(
        config.socket_addr().unwrap(),
        "0.0.0.0:6000".parse::<SocketAddr>().unwrap()
    );
}

#[test]
fn test_validate_requires_a_route() {
    let config = parse(&[]);
    assert!(config.validate().is_err());

    let config = parse(&["-p", "appsrc name=src ! fakesink"]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_duplicate_payload_types() {
    let config = parse(&["-t", "96=vp8", "-t", "96=h264"]);
    assert!(matches!(config.validate(), Err(RtpSinkError::TrackExists(96))));
}

#[test]
fn test_invalid_bind_address() {
    let config = parse(&["-t", "96=vp8", "-b", "not an address"]);
    assert!(config.socket_addr().is_err());
}


#[test]
fn test_ipv6_bind_addresses() {
    let config = parse(&["-t", "96=vp8", "-b", "::"]);
    assert_eq!(
        config.socket_addr().unwrap(),
        "[::]:5004".parse::<SocketAddr>().unwrap()
    );

    let config = parse(&["-t", "96=vp8", "-b", "::1", "-P", "6000"]);
    let addr = config.socket_addr().unwrap();
    assert!(addr.is_ipv6());
    assert_eq!(addr, "[::1]:6000".parse::<SocketAddr>().unwrap());
}

#[test]
fn test_ipv4_bind_address() {
    let config = parse(&["-t", "96=vp8", "-b", "127.0.0.1"]);
    assert_eq!(
        config.socket_addr().unwrap(),
        "127.0.0.1:5004".parse::<SocketAddr>().unwrap()
    );
}
