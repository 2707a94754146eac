//! # Conductor - Parameterized Audio Demos
//!
//! A small shell for audio demos: a declarative signal chain, a store of named,
//! bounded parameters that ramp their nodes, and a transport that loops one
//! preloaded sample.
//!
//! ## Architecture
//!
//! Conductor is an umbrella crate that coordinates:
//! - **conductor-core** - Parameter store, chains, graph runtime, transport, backends
//! - **conductor-sampler** - Asset lookup and AIFF/WAV decoding
//! - **conductor-dsp** - Node kernels (oscillator, player, fader, balancer, auto-wah, mixers)
//!
//! ## Quick Start
//!
//! ```ignore
//! use conductor::prelude::*;
//!
//! let mut conductor = ConductorBuilder::new()
//!     .chain(presets::auto_wah())
//!     .build()?;
//!
//! conductor.start()?;
//! conductor.play()?;
//! conductor.set_parameter("wah", 0.8)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Offline rendering only
//! - `output` - CPAL audio output

/// Re-export of conductor-core for direct access
pub use conductor_core as core;

/// Re-export of conductor-sampler
pub use conductor_sampler as sampler;

/// Re-export of conductor-dsp
pub use conductor_dsp as dsp;

pub use conductor_core::{
    // Parameters
    ParameterChange,
    ParameterRange,
    ParameterSpec,
    ParameterStore,
    RampSource,

    // Chains
    ChainSpec,
    NodeRegistry,
    NodeTap,

    // Engine
    AudioBackend,
    EngineConfig,
    EngineState,
    OfflineBackend,
    RetryPolicy,
    SampleBuffer,
    SignalGraphAdapter,

    // Transport
    TransportState,
};

#[cfg(feature = "output")]
pub use conductor_core::CpalBackend;

pub use conductor_sampler::{load_sample, AssetBundle, DEFAULT_SAMPLE_PATH};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::ConductorBuilder;

pub mod presets;

/// A demo's control surface: parameters, transport and engine in one.
pub type Conductor<B = OfflineBackend> = SignalGraphAdapter<B>;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::presets;
    pub use crate::{Conductor, ConductorBuilder};

    pub use crate::core::{
        params, AudioBackend, ChainSpec, EngineState, ParameterRange, ParameterSpec, RampSource,
        RetryPolicy, TransportState,
    };

    pub use crate::sampler::AssetBundle;
}
