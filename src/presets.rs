//! The two stock demos, as chain descriptions.

use crate::core::{params, ChainSpec, ParameterRange, ParameterSpec, RampSource, DEFAULT_TAP_HISTORY};
use conductor_dsp::{MAX_RATE, MIN_RATE};

/// Ramp time of the balancer's oscillator frequency.
pub const FREQUENCY_RAMP_SECONDS: f32 = 0.5;

/// An oscillator whose level follows a variable-speed drum loop.
///
/// ```text
/// oscillator ───────────────> balancer (signal)
/// player(rate) ──> fader ──> balancer (comparator) ──> out
/// ```
pub fn balancer() -> ChainSpec {
    ChainSpec::new("balancer")
        .node("oscillator", "oscillator", params! { "frequency" => 440.0 })
        .node("player", "player", params! {})
        .node("fader", "fader", params! {})
        .node("balancer", "balancer", params! {})
        .connect("player", "fader", 0)
        .connect("oscillator", "balancer", 0)
        .connect("fader", "balancer", 1)
        .output("balancer")
        .source("player")
        .bind(
            ParameterSpec::new("rate", ParameterRange::new(MIN_RATE, MAX_RATE, 1.0))
                .label("Rate")
                .units("Generic"),
            "player",
            "rate",
        )
        .bind(
            ParameterSpec::new("frequency", ParameterRange::new(220.0, 880.0, 440.0))
                .label("Frequency")
                .units("Hz")
                .ramp(RampSource::Fixed(FREQUENCY_RAMP_SECONDS)),
            "oscillator",
            "frequency",
        )
}

/// A drum loop through an auto-wah, blended back with the dry loop.
///
/// Wah, mix and amplitude ramp over the current `ramp_duration`. Playback
/// waits for an explicit play.
pub fn auto_wah() -> ChainSpec {
    let ramped = || RampSource::FromParameter("ramp_duration".into());

    ChainSpec::new("auto_wah")
        .node("player", "player", params! {})
        .node("auto_wah", "auto_wah", params! {})
        .node("mixer", "dry_wet_mixer", params! {})
        .connect("player", "auto_wah", 0)
        .connect("player", "mixer", 0)
        .connect("auto_wah", "mixer", 1)
        .output("mixer")
        .source("player")
        .bind(
            ParameterSpec::new("wah", ParameterRange::new(0.0, 1.0, 0.0))
                .label("Wah Amount")
                .ramp(ramped()),
            "auto_wah",
            "wah",
        )
        .bind(
            ParameterSpec::new("mix", ParameterRange::new(0.0, 1.0, 1.0))
                .label("Mix")
                .ramp(ramped()),
            "auto_wah",
            "mix",
        )
        .bind(
            ParameterSpec::new("amplitude", ParameterRange::new(0.0, 1.0, 0.1))
                .label("Overall level")
                .ramp(ramped()),
            "auto_wah",
            "amplitude",
        )
        .parameter(
            ParameterSpec::new("ramp_duration", ParameterRange::new(0.0, 4.0, 0.02))
                .label("Ramp Duration")
                .format("%0.2f")
                .units("s"),
        )
        .bind(
            ParameterSpec::new("balance", ParameterRange::new(0.0, 1.0, 0.5))
                .label("Balance")
                .format("%0.2f"),
            "mixer",
            "balance",
        )
        .tap("player", DEFAULT_TAP_HISTORY)
        .tap("auto_wah", DEFAULT_TAP_HISTORY)
        .tap("mixer", DEFAULT_TAP_HISTORY)
        .autoplay(false)
}
