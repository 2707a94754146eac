//! Gain stage.

use conductor_core::{get_param_or, AudioNode, NodeParams, NodeRegistryError, ParamControl, RampedParam};
use std::sync::Arc;

pub struct FaderNode {
    gain: RampedParam,
}

impl FaderNode {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: RampedParam::new(gain, crate::DEFAULT_SR),
        }
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        Ok(Self::new(get_param_or(params, "gain", 1.0, |v| v.as_f32())?))
    }
}

impl AudioNode for FaderNode {
    fn kind(&self) -> &'static str {
        "fader"
    }

    fn inputs(&self) -> usize {
        1
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.gain.reset();
    }

    #[inline]
    fn tick(&mut self, input: &[f32]) -> f32 {
        input[0] * self.gain.next_sample()
    }

    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        vec![("gain", self.gain.control())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain() {
        let mut fader = FaderNode::new(0.5);
        assert_eq!(fader.tick(&[0.8]), 0.4);
        fader.controls()[0].1.set_immediate(2.0);
        assert_eq!(fader.tick(&[0.25]), 0.5);
    }
}
