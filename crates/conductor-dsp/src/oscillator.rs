//! Sine oscillator node.

use conductor_core::{get_param_or, AudioNode, NodeParams, NodeRegistryError, ParamControl, RampedParam};
use std::f64::consts::TAU;
use std::sync::Arc;

pub const DEFAULT_FREQUENCY: f32 = 440.0;

pub struct OscillatorNode {
    frequency: RampedParam,
    amplitude: RampedParam,
    phase: f64,
    sample_rate: f64,
}

impl OscillatorNode {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency: RampedParam::new(frequency, crate::DEFAULT_SR),
            amplitude: RampedParam::new(amplitude, crate::DEFAULT_SR),
            phase: 0.0,
            sample_rate: crate::DEFAULT_SR,
        }
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        let frequency = get_param_or(params, "frequency", DEFAULT_FREQUENCY, |v| v.as_f32())?;
        let amplitude = get_param_or(params, "amplitude", 1.0, |v| v.as_f32())?;
        if !(frequency >= 0.0) {
            return Err(NodeRegistryError::InvalidParameter(
                "frequency".into(),
                format!("{frequency} (must be >= 0)"),
            ));
        }
        Ok(Self::new(frequency, amplitude))
    }
}

impl AudioNode for OscillatorNode {
    fn kind(&self) -> &'static str {
        "oscillator"
    }

    fn inputs(&self) -> usize {
        0
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.frequency.set_sample_rate(sample_rate);
        self.amplitude.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.frequency.reset();
        self.amplitude.reset();
    }

    #[inline]
    fn tick(&mut self, _input: &[f32]) -> f32 {
        let frequency = self.frequency.next_sample().max(0.0) as f64;
        let amplitude = self.amplitude.next_sample();

        let out = (self.phase * TAU).sin() as f32 * amplitude;

        self.phase += frequency / self.sample_rate;
        self.phase -= self.phase.floor();

        out
    }

    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        vec![
            ("frequency", self.frequency.control()),
            ("amplitude", self.amplitude.control()),
        ]
    }
}
