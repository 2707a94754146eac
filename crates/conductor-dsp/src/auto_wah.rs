//! Envelope-controlled wah filter.

use conductor_core::{get_param_or, AudioNode, NodeParams, NodeRegistryError, ParamControl, RampedParam};
use std::f32::consts::PI;
use std::sync::Arc;

const ATTACK_TIME: f32 = 0.005;
const RELEASE_TIME: f32 = 0.1;

/// Sweep range of the bandpass centre.
const MIN_FREQUENCY: f32 = 200.0;
const MAX_FREQUENCY: f32 = 3000.0;

/// How strongly the envelope pushes the sweep at full wah.
const SENSITIVITY: f32 = 4.0;

const Q: f32 = 3.0;

/// Bandpass whose centre follows the input's envelope.
///
/// `wah` sets how far the envelope sweeps the filter, `mix` blends the
/// filtered signal with the dry input and `amplitude` scales the result.
pub struct AutoWahNode {
    wah: RampedParam,
    mix: RampedParam,
    amplitude: RampedParam,
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    // State-variable filter integrators
    ic1: f32,
    ic2: f32,
    sample_rate: f64,
}

impl AutoWahNode {
    pub fn new(wah: f32, mix: f32, amplitude: f32) -> Self {
        let mut node = Self {
            wah: RampedParam::new(wah, crate::DEFAULT_SR),
            mix: RampedParam::new(mix, crate::DEFAULT_SR),
            amplitude: RampedParam::new(amplitude, crate::DEFAULT_SR),
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            ic1: 0.0,
            ic2: 0.0,
            sample_rate: crate::DEFAULT_SR,
        };
        node.set_sample_rate(crate::DEFAULT_SR);
        node
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        let wah = get_param_or(params, "wah", 0.0, |v| v.as_f32())?;
        let mix = get_param_or(params, "mix", 1.0, |v| v.as_f32())?;
        let amplitude = get_param_or(params, "amplitude", 0.1, |v| v.as_f32())?;
        Ok(Self::new(wah, mix, amplitude))
    }

    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    #[inline]
    fn time_to_coeff(time: f32, sample_rate: f64) -> f32 {
        if time <= 0.0 {
            0.0
        } else {
            (-1.0 / (time * sample_rate as f32)).exp()
        }
    }

    /// Centre frequency for a given sweep position in 0..=1.
    #[inline]
    fn frequency(sweep: f32) -> f32 {
        MIN_FREQUENCY * (MAX_FREQUENCY / MIN_FREQUENCY).powf(sweep)
    }

    #[inline]
    fn follow(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * level;
        self.envelope
    }

    /// Unity-peak bandpass (TPT state-variable filter).
    #[inline]
    fn bandpass(&mut self, input: f32, frequency: f32) -> f32 {
        let nyquist_safe = frequency.min(0.45 * self.sample_rate as f32);
        let g = (PI * nyquist_safe / self.sample_rate as f32).tan();
        let k = 1.0 / Q;

        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;

        let v3 = input - self.ic2;
        let v1 = a1 * self.ic1 + a2 * v3;
        let v2 = self.ic2 + a2 * self.ic1 + a3 * v3;

        self.ic1 = 2.0 * v1 - self.ic1;
        self.ic2 = 2.0 * v2 - self.ic2;

        v1 * k
    }
}

impl AudioNode for AutoWahNode {
    fn kind(&self) -> &'static str {
        "auto_wah"
    }

    fn inputs(&self) -> usize {
        1
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.attack_coeff = Self::time_to_coeff(ATTACK_TIME, sample_rate);
        self.release_coeff = Self::time_to_coeff(RELEASE_TIME, sample_rate);
        self.wah.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        self.amplitude.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope = 0.0;
        self.ic1 = 0.0;
        self.ic2 = 0.0;
        self.wah.reset();
        self.mix.reset();
        self.amplitude.reset();
    }

    #[inline]
    fn tick(&mut self, input: &[f32]) -> f32 {
        let dry = input[0];
        let wah = self.wah.next_sample().clamp(0.0, 1.0);
        let mix = self.mix.next_sample().clamp(0.0, 1.0);
        let amplitude = self.amplitude.next_sample();

        let envelope = self.follow(dry);
        let sweep = (wah * envelope * SENSITIVITY).min(1.0);
        let wet = self.bandpass(dry, Self::frequency(sweep));

        amplitude * (mix * wet + (1.0 - mix) * dry)
    }

    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        vec![
            ("wah", self.wah.control()),
            ("mix", self.mix.control()),
            ("amplitude", self.amplitude.control()),
        ]
    }
}
