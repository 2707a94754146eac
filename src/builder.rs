//! Builder for configuring and constructing a [`Conductor`](crate::Conductor).

use crate::core::{
    AudioBackend, ChainSpec, EngineConfig, NodeRegistry, OfflineBackend, SampleBuffer,
    SignalGraphAdapter,
};
use crate::sampler::{load_sample, AssetBundle, DEFAULT_SAMPLE_PATH};
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// The sample is decoded exactly once, while building; every later start of the
/// returned conductor replays the same buffer.
///
/// # Example
///
/// ```ignore
/// use conductor::prelude::*;
///
/// let mut conductor = ConductorBuilder::new()
///     .chain(presets::balancer())
///     .asset_root("assets")
///     .build()?;
///
/// conductor.start()?;
/// conductor.set_parameter("frequency", 660.0)?;
/// ```
pub struct ConductorBuilder {
    chain: Option<ChainSpec>,
    assets: Option<AssetBundle>,
    sample: PathBuf,
    buffer: Option<Arc<SampleBuffer>>,
    registry: Option<NodeRegistry>,
    config: EngineConfig,
}

impl Default for ConductorBuilder {
    fn default() -> Self {
        Self {
            chain: None,
            assets: None,
            sample: PathBuf::from(DEFAULT_SAMPLE_PATH),
            buffer: None,
            registry: None,
            config: EngineConfig::default(),
        }
    }
}

impl ConductorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: ChainSpec) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Default: `$CONDUCTOR_ASSETS`, or `./assets`
    pub fn assets(mut self, assets: AssetBundle) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn asset_root(self, root: impl Into<PathBuf>) -> Self {
        self.assets(AssetBundle::new(root))
    }

    /// Sample path relative to the asset root. Default: `Samples/beat.aiff`
    pub fn sample(mut self, path: impl Into<PathBuf>) -> Self {
        self.sample = path.into();
        self
    }

    /// Use an already decoded buffer instead of loading the sample.
    pub fn buffer(mut self, buffer: Arc<SampleBuffer>) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Default: every node kind from `conductor-dsp`
    pub fn registry(mut self, registry: NodeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Rate for offline rendering. Device backends use the device rate.
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    pub fn output_device(mut self, index: usize) -> Self {
        self.config.output_device = Some(index);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build against any backend.
    pub fn build_with<B: AudioBackend>(self, backend: B) -> Result<SignalGraphAdapter<B>> {
        let chain = self.chain.ok_or(Error::MissingChain)?;

        let buffer = match self.buffer {
            Some(buffer) => buffer,
            None => {
                let assets = self.assets.unwrap_or_else(AssetBundle::from_env);
                let path = assets.resolve(&self.sample)?;
                info!(path = %path.display(), "loading sample");
                Arc::new(load_sample(&path)?)
            }
        };

        let registry = self.registry.unwrap_or_else(conductor_dsp::registry);

        Ok(SignalGraphAdapter::new(&chain, &registry, backend, buffer)?)
    }

    /// Build with a deterministic in-memory backend.
    pub fn build_offline(self) -> Result<SignalGraphAdapter<OfflineBackend>> {
        let backend = OfflineBackend::from_config(&self.config)?;
        self.build_with(backend)
    }

    /// Build for the default (or configured) audio output device.
    #[cfg(feature = "output")]
    pub fn build(self) -> Result<SignalGraphAdapter<crate::core::CpalBackend>> {
        self.config.validate()?;
        let backend = crate::core::CpalBackend::new(&self.config)?;
        self.build_with(backend)
    }
}
