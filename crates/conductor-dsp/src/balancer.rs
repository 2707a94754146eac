//! RMS balancer: scales a signal so its level follows a comparator.

use conductor_core::{get_param_or, AudioNode, NodeParams, NodeRegistryError};
use std::f64::consts::TAU;

pub const DEFAULT_HALF_POWER_POINT: f32 = 10.0;

/// Squared levels below this count as silence.
const SILENCE: f32 = 1e-12;

/// Output is input 0 (signal) with the RMS level of input 1 (comparator).
///
/// Both levels come from one-pole lowpass filters on the squared inputs, with
/// the cutoff at the half-power point.
pub struct BalancerNode {
    half_power_point: f32,
    c1: f32,
    c2: f32,
    signal_power: f32,
    comparator_power: f32,
}

impl BalancerNode {
    pub fn new(half_power_point: f32) -> Self {
        let mut node = Self {
            half_power_point,
            c1: 0.0,
            c2: 0.0,
            signal_power: 0.0,
            comparator_power: 0.0,
        };
        node.set_sample_rate(crate::DEFAULT_SR);
        node
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        let hp = get_param_or(
            params,
            "half_power_point",
            DEFAULT_HALF_POWER_POINT,
            |v| v.as_f32(),
        )?;
        if !(hp > 0.0) {
            return Err(NodeRegistryError::InvalidParameter(
                "half_power_point".into(),
                format!("{hp} (must be > 0)"),
            ));
        }
        Ok(Self::new(hp))
    }

    /// Current gain applied to the signal.
    pub fn gain(&self) -> f32 {
        if self.signal_power > SILENCE {
            (self.comparator_power / self.signal_power).sqrt()
        } else {
            0.0
        }
    }
}

impl AudioNode for BalancerNode {
    fn kind(&self) -> &'static str {
        "balancer"
    }

    fn inputs(&self) -> usize {
        2
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        let b = 2.0 - (TAU * self.half_power_point as f64 / sample_rate).cos();
        let c2 = b - (b * b - 1.0).sqrt();
        self.c2 = c2 as f32;
        self.c1 = (1.0 - c2) as f32;
    }

    fn reset(&mut self) {
        self.signal_power = 0.0;
        self.comparator_power = 0.0;
    }

    #[inline]
    fn tick(&mut self, input: &[f32]) -> f32 {
        let (signal, comparator) = (input[0], input[1]);

        self.signal_power = self.c1 * signal * signal + self.c2 * self.signal_power;
        self.comparator_power = self.c1 * comparator * comparator + self.c2 * self.comparator_power;

        signal * self.gain()
    }
}
