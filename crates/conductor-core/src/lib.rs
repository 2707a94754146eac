//! Parameter store, declarative signal chains, transport and engine backends.
//!
//! # Primary API
//!
//! - [`SignalGraphAdapter`]: a demo's control surface over a running chain
//! - [`ChainSpec`]: declarative node list and wiring
//! - [`ParameterStore`]: clamped, named parameters with a single observer
//! - [`TransportController`]: stop/play/pause over one looped buffer
//! - [`AudioBackend`]: [`OfflineBackend`] always, [`CpalBackend`] with `"output"`
//!
//! # Feature-gated APIs
//!
//! - `"output"`: CPAL audio output
//!
//! # Example
//!
//! ```ignore
//! use conductor_core::*;
//!
//! let registry = NodeRegistry::new();
//! conductor_dsp::register_nodes(&registry);
//!
//! let mut adapter = SignalGraphAdapter::new(&chain, &registry, OfflineBackend::new(44100.0), buffer)?;
//! adapter.start()?;
//! adapter.set_parameter("frequency", 660.0)?;
//! ```

pub mod error;
pub use error::{Error, NodeRegistryError, Result};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat, Generation};

pub mod ramp;
pub use ramp::LinearRamp;

pub mod parameter;
pub use parameter::{ParameterRange, ParameterSpec, RampSource};

pub mod store;
pub use store::{Parameter, ParameterChange, ParameterObserver, ParameterStore};

pub mod control;
pub use control::{ParamControl, PlaybackTarget, RampedParam};

pub mod buffer;
pub use buffer::SampleBuffer;

pub mod node;
pub use node::AudioNode;

pub mod registry;
pub use registry::{get_param, get_param_or, NodeConstructor, NodeParamValue, NodeParams, NodeRegistry};

pub mod chain;
pub use chain::{ChainSpec, Connection, ControlRef, NodeSpec, ParameterBinding, TapSpec, DEFAULT_TAP_HISTORY};

pub mod tap;
pub use tap::{NodeTap, TapWriter};

pub mod graph;
pub use graph::{GraphControls, SharedGraph, SignalGraph};

pub(crate) mod transport;
pub use transport::{TransitionResult, TransportController, TransportEvent, TransportFSM, TransportState};

pub mod config;
pub use config::EngineConfig;

pub mod backend;
pub use backend::AudioBackend;

pub mod offline;
pub use offline::OfflineBackend;

#[cfg(feature = "output")]
pub mod output;
#[cfg(feature = "output")]
pub use output::CpalBackend;

pub mod adapter;
pub use adapter::{EngineState, RetryPolicy, SignalGraphAdapter, DEFAULT_MAX_BACKOFF};
