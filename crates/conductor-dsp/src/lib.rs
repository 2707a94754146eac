//! Node kernels for conductor signal chains.
//!
//! Every node is mono, reads its parameters through lock-free
//! [`ParamControl`](conductor_core::ParamControl)s and ramps them on the render
//! thread. [`register_nodes`] makes all of them available to a
//! [`NodeRegistry`] under the kind names used in chain descriptions.

mod auto_wah;
mod balancer;
mod fader;
mod mixer;
mod oscillator;
mod player;

pub use auto_wah::AutoWahNode;
pub use balancer::{BalancerNode, DEFAULT_HALF_POWER_POINT};
pub use fader::FaderNode;
pub use mixer::{DryWetMixerNode, MixerNode};
pub use oscillator::{OscillatorNode, DEFAULT_FREQUENCY};
pub use player::{PlayerControl, PlayerNode, MAX_RATE, MIN_RATE};

use conductor_core::NodeRegistry;

/// Rate nodes assume until the graph tells them otherwise.
pub(crate) const DEFAULT_SR: f64 = 44100.0;

/// Register every node kind in this crate.
pub fn register_nodes(registry: &NodeRegistry) {
    registry.register("oscillator", |p| Ok(Box::new(OscillatorNode::from_params(p)?)));
    registry.register("player", |p| Ok(Box::new(PlayerNode::from_params(p)?)));
    registry.register("fader", |p| Ok(Box::new(FaderNode::from_params(p)?)));
    registry.register("balancer", |p| Ok(Box::new(BalancerNode::from_params(p)?)));
    registry.register("auto_wah", |p| Ok(Box::new(AutoWahNode::from_params(p)?)));
    registry.register("dry_wet_mixer", |p| Ok(Box::new(DryWetMixerNode::from_params(p)?)));
    registry.register("mixer", |p| Ok(Box::new(MixerNode::from_params(p)?)));
}

/// A registry with every node kind in this crate.
pub fn registry() -> NodeRegistry {
    let registry = NodeRegistry::new();
    register_nodes(&registry);
    registry
}
