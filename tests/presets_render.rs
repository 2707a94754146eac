//! Rendering the stock chains offline.
//!
//! Run with:
//! ```bash
//! cargo test -p conductor --test presets_render
//! ```

#[path = "helpers/mod.rs"]
mod helpers;

use conductor::prelude::*;
use helpers::{assert_has_audio, assert_silence, rms, test_buffer, TEST_SAMPLE_RATE};

const HALF_SECOND: usize = TEST_SAMPLE_RATE as usize / 2;

fn offline(chain: ChainSpec) -> Conductor {
    ConductorBuilder::new()
        .chain(chain)
        .buffer(test_buffer())
        .sample_rate(TEST_SAMPLE_RATE)
        .build_offline()
        .expect("conductor builds")
}

fn left(interleaved: &[f32]) -> Vec<f32> {
    interleaved.iter().step_by(2).copied().collect()
}

#[test]
fn test_silent_before_start() {
    let mut conductor = offline(presets::balancer());
    assert_silence(&conductor.backend_mut().render(1024));
}

#[test]
fn test_balancer_follows_loop_level() {
    let mut conductor = offline(presets::balancer());
    conductor.start().unwrap();

    conductor.backend_mut().render(HALF_SECOND);
    let out = conductor.backend_mut().render(4410);
    assert_has_audio(&out, 0.05);

    // The balanced sine settles near the loop's own level
    let loop_rms = rms(test_buffer().samples());
    let out_rms = rms(&out);
    assert!(
        (out_rms - loop_rms).abs() < loop_rms * 0.5,
        "balanced rms {out_rms} too far from loop rms {loop_rms}"
    );
}

#[test]
fn test_output_is_stereo_duplicate() {
    let mut conductor = offline(presets::balancer());
    conductor.start().unwrap();
    let out = conductor.backend_mut().render(256);
    for frame in out.chunks(2) {
        assert_eq!(frame[0], frame[1]);
    }
}

#[test]
fn test_auto_wah_waits_for_play() {
    let mut conductor = offline(presets::auto_wah());
    conductor.start().unwrap();
    assert_silence(&conductor.backend_mut().render(4410));

    conductor.play().unwrap();
    assert_has_audio(&conductor.backend_mut().render(4410), 0.01);

    conductor.pause();
    // The bandpass rings out before the chain falls silent
    conductor.backend_mut().render(4410);
    assert_silence(&conductor.backend_mut().render(4410));
}

#[test]
fn test_taps_fill_history() {
    let mut conductor = offline(presets::auto_wah());
    for tap in conductor.taps() {
        tap.start();
    }
    conductor.start().unwrap();
    conductor.play().unwrap();
    conductor.backend_mut().render(4096);

    for tap in conductor.taps() {
        assert_eq!(tap.poll(), 4096, "tap on {}", tap.node());
        assert_eq!(tap.history().len(), tap.history_len());
        assert_eq!(tap.history_len(), 128);
    }

    let player = conductor.tap("player").unwrap().history();
    assert!(helpers::peak(&player) > 0.1);
}

#[test]
fn test_stopped_tap_records_nothing() {
    let mut conductor = offline(presets::auto_wah());
    conductor.start().unwrap();
    conductor.play().unwrap();
    conductor.backend_mut().render(1024);

    let tap = conductor.tap("mixer").unwrap();
    assert!(!tap.is_running());
    assert_eq!(tap.poll(), 0);
    assert!(tap.history().is_empty());
}

#[test]
fn test_amplitude_change_is_ramped() {
    let mut conductor = offline(presets::auto_wah());
    conductor.set_parameter("balance", 1.0).unwrap();
    conductor.set_parameter("ramp_duration", 1.0).unwrap();
    conductor.start().unwrap();
    conductor.play().unwrap();
    conductor.backend_mut().render(HALF_SECOND);

    conductor.set_parameter("amplitude", 1.0).unwrap();
    let early = rms(&left(&conductor.backend_mut().render(441)));

    conductor.backend_mut().render(TEST_SAMPLE_RATE as usize);
    let late = rms(&left(&conductor.backend_mut().render(4410)));

    assert!(late > 0.0);
    assert!(
        early < late * 0.3,
        "amplitude jumped instead of ramping: early {early}, late {late}"
    );
}

#[test]
fn test_parameters_apply_while_paused() {
    let mut conductor = offline(presets::auto_wah());
    conductor.set_parameter("balance", 1.0).unwrap();
    conductor.start().unwrap();
    conductor.play().unwrap();
    conductor.backend_mut().render(HALF_SECOND);
    let before = rms(&conductor.backend_mut().render(4410));

    conductor.pause();
    conductor.set_parameter("amplitude", 0.0).unwrap();
    conductor.backend_mut().render(4410);
    conductor.play().unwrap();

    conductor.backend_mut().render(4410);
    let after = rms(&conductor.backend_mut().render(4410));
    assert!(before > 0.001);
    assert!(after < before * 0.01, "before {before}, after {after}");
}
