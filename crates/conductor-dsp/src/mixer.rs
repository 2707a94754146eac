//! Summing and crossfading mixers.

use conductor_core::{get_param_or, AudioNode, NodeParams, NodeRegistryError, ParamControl, RampedParam};
use std::sync::Arc;

/// Crossfade between input 0 (dry) and input 1 (wet).
///
/// Balance 0 is all dry, 1 is all wet.
pub struct DryWetMixerNode {
    balance: RampedParam,
}

impl DryWetMixerNode {
    pub fn new(balance: f32) -> Self {
        Self {
            balance: RampedParam::new(balance, crate::DEFAULT_SR),
        }
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        Ok(Self::new(get_param_or(params, "balance", 0.5, |v| v.as_f32())?))
    }
}

impl AudioNode for DryWetMixerNode {
    fn kind(&self) -> &'static str {
        "dry_wet_mixer"
    }

    fn inputs(&self) -> usize {
        2
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.balance.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.balance.reset();
    }

    #[inline]
    fn tick(&mut self, input: &[f32]) -> f32 {
        let balance = self.balance.next_sample().clamp(0.0, 1.0);
        input[0] * (1.0 - balance) + input[1] * balance
    }

    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        vec![("balance", self.balance.control())]
    }
}

/// Sum of `inputs` signals scaled by `volume`.
pub struct MixerNode {
    inputs: usize,
    volume: RampedParam,
}

impl MixerNode {
    pub fn new(inputs: usize, volume: f32) -> Self {
        Self {
            inputs,
            volume: RampedParam::new(volume, crate::DEFAULT_SR),
        }
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        let inputs = get_param_or(params, "inputs", 2, |v| v.as_i64())?;
        if inputs < 1 {
            return Err(NodeRegistryError::InvalidParameter(
                "inputs".into(),
                format!("{inputs} (must be >= 1)"),
            ));
        }
        let volume = get_param_or(params, "volume", 1.0, |v| v.as_f32())?;
        Ok(Self::new(inputs as usize, volume))
    }
}

impl AudioNode for MixerNode {
    fn kind(&self) -> &'static str {
        "mixer"
    }

    fn inputs(&self) -> usize {
        self.inputs
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.volume.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.volume.reset();
    }

    #[inline]
    fn tick(&mut self, input: &[f32]) -> f32 {
        input.iter().sum::<f32>() * self.volume.next_sample()
    }

    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        vec![("volume", self.volume.control())]
    }
}
