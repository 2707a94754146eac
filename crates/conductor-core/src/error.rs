//! Error types for conductor-core.

use thiserror::Error;

/// Error type for conductor-core operations.
///
/// Construction-time variants (chain, registry, parameter spec) are fatal for the
/// object being built. [`Error::EngineStart`] and the device variants are runtime
/// failures reported by [`SignalGraphAdapter::start`](crate::SignalGraphAdapter::start).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Node '{node}' has no control named '{control}'")]
    UnknownControl { node: String, control: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid parameter spec: {0}")]
    InvalidParameterSpec(String),

    #[error("Invalid value for '{name}': {value}")]
    InvalidValue { name: String, value: f32 },

    #[error("Invalid sample buffer: {0}")]
    InvalidBuffer(String),

    #[error("Node construction failed: {0}")]
    NodeRegistry(#[from] NodeRegistryError),

    #[error("Audio engine failed to start: {0}")]
    EngineStart(String),

    #[error("Audio engine is not running")]
    EngineNotRunning,

    #[cfg(feature = "output")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "output")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "output")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "output")]
    #[error("Failed to enumerate devices")]
    DevicesError(#[from] cpal::DevicesError),

    #[cfg(feature = "output")]
    #[error("Failed to query device configurations")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[cfg(feature = "output")]
    #[error("Failed to get device name")]
    DeviceNameError(#[from] cpal::DeviceNameError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from node registry operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeRegistryError {
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{0}': {1}")]
    InvalidParameter(String, String),

    #[error("Node construction failed: {0}")]
    ConstructionFailed(String),
}
