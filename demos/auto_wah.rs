//! Auto-wah demo: a drum loop through an envelope-driven bandpass, with live
//! output plots printed as peak levels.
//!
//! Expects `assets/Samples/beat.aiff` (or set `CONDUCTOR_ASSETS`).
//!
//! Run with: `cargo run --example auto_wah --features output`

use conductor::prelude::*;
use std::thread::sleep;
use std::time::Duration;

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |a, s| a.max(s.abs()))
}

fn main() -> conductor::Result<()> {
    tracing_subscriber::fmt::init();

    let mut conductor = ConductorBuilder::new().chain(presets::auto_wah()).build()?;
    conductor.start_with_retry(&RetryPolicy::default())?;

    for tap in conductor.taps() {
        tap.start();
    }

    conductor.play()?;
    conductor.set_parameter("amplitude", 0.5)?;

    for (wah, mix) in [(0.0, 1.0), (0.3, 1.0), (0.7, 0.8), (1.0, 0.5)] {
        conductor.set_parameter("wah", wah)?;
        conductor.set_parameter("mix", mix)?;

        for _ in 0..10 {
            sleep(Duration::from_millis(200));
            let levels: Vec<String> = conductor
                .taps()
                .iter_mut()
                .map(|tap| {
                    tap.poll();
                    format!("{}={:.3}", tap.node(), peak(&tap.history()))
                })
                .collect();
            println!("wah={wah:.1} mix={mix:.1}  {}", levels.join("  "));
        }
    }

    // Slow ramps for the last sweep
    conductor.set_parameter("ramp_duration", 2.0)?;
    conductor.set_parameter("wah", 0.0)?;
    sleep(Duration::from_secs(3));

    println!("paused: {:?}", conductor.toggle()?);
    sleep(Duration::from_secs(1));
    println!("resumed: {:?}", conductor.toggle()?);
    sleep(Duration::from_secs(2));

    conductor.stop();
    Ok(())
}
