//! Balancer demo: a sine whose level follows a variable-speed drum loop.
//!
//! Expects `assets/Samples/beat.aiff` (or set `CONDUCTOR_ASSETS`).
//!
//! Run with: `cargo run --example balancer --features output`

use conductor::prelude::*;
use std::thread::sleep;
use std::time::Duration;

fn main() -> conductor::Result<()> {
    tracing_subscriber::fmt::init();

    let mut conductor = ConductorBuilder::new().chain(presets::balancer()).build()?;
    conductor.start_with_retry(&RetryPolicy::default())?;

    println!("Playing at {} Hz", conductor.sample_rate());

    for frequency in [440.0, 660.0, 880.0, 330.0, 220.0] {
        let change = conductor.set_parameter("frequency", frequency)?;
        println!("frequency -> {} Hz", change.value);
        sleep(Duration::from_secs(2));
    }

    for rate in [0.5, 1.0, 2.0, 1.0] {
        conductor.set_parameter("rate", rate)?;
        println!("rate -> {rate}x");
        sleep(Duration::from_secs(2));
    }

    conductor.stop();
    Ok(())
}
