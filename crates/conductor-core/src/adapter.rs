//! Glue between the parameter store, the signal graph, the transport and an
//! engine backend.
//!
//! The adapter owns everything a demo needs on the control side. Parameter writes
//! go through the store, whose observer forwards them to node controls as ramp
//! instructions; transport commands go to the source node; and the backend runs
//! the graph.

use crate::backend::AudioBackend;
use crate::buffer::SampleBuffer;
use crate::chain::ChainSpec;
use crate::control::ParamControl;
use crate::graph::{SharedGraph, SignalGraph};
use crate::registry::NodeRegistry;
use crate::store::{ParameterChange, ParameterObserver, ParameterStore};
use crate::tap::NodeTap;
use crate::transport::{TransportController, TransportState};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Whether the backend is pulling audio.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    /// The last start attempt failed.
    Failed(String),
}

impl EngineState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Exponential back-off for [`SignalGraphAdapter::start_with_retry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total start attempts, at least one is always made.
    pub attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f32,
    /// Upper bound on any single wait.
    pub max_backoff: Duration,
}

/// Longest wait between start attempts unless a policy says otherwise.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2.0,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            attempts,
            initial_backoff,
            ..Default::default()
        }
    }

    pub fn multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Wait before attempt `attempt` (0-based). The first attempt never waits,
    /// and no wait exceeds `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }
        let exponent = (attempt - 1).min(i32::MAX as u32) as i32;
        let factor = (self.multiplier.max(1.0) as f64).powi(exponent);
        let secs = self.initial_backoff.as_secs_f64() * factor;

        Duration::try_from_secs_f64(secs)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }
}

/// Turns stored parameter changes into ramp instructions for node controls.
struct RampForwarder {
    targets: HashMap<String, Arc<ParamControl>>,
}

impl ParameterObserver for RampForwarder {
    fn parameter_changed(&mut self, change: &ParameterChange) {
        if let Some(control) = self.targets.get(&change.name) {
            control.ramp_to(change.value, change.ramp_seconds);
        }
    }
}

/// A demo's control surface over a running signal chain.
pub struct SignalGraphAdapter<B: AudioBackend> {
    name: String,
    store: ParameterStore,
    graph: SharedGraph,
    transport: TransportController,
    taps: Vec<NodeTap>,
    backend: B,
    state: EngineState,
    autoplay: bool,
}

impl<B: AudioBackend> SignalGraphAdapter<B> {
    /// Build the chain's graph and wire its parameters.
    ///
    /// Every failure here is fatal: an unknown node kind, a node that fails to
    /// construct, a binding to a control the node lacks, or a chain without a
    /// playable source.
    pub fn new(
        chain: &ChainSpec,
        registry: &NodeRegistry,
        backend: B,
        buffer: Arc<SampleBuffer>,
    ) -> Result<Self> {
        let (graph, mut controls) = SignalGraph::build(chain, registry, backend.sample_rate())?;

        let mut targets = HashMap::new();
        for binding in &chain.parameters {
            if let Some(target) = &binding.target {
                let control = controls.control(&target.node, &target.control)?;
                targets.insert(binding.parameter.name.clone(), control);
            }
        }

        let mut store = ParameterStore::new(chain.parameters.iter().map(|b| b.parameter.clone()))?;

        // Nodes start at the declared defaults, not at whatever they were built with
        for param in store.iter() {
            if let Some(control) = targets.get(param.name()) {
                control.set_immediate(param.value());
            }
        }
        store.set_observer(Box::new(RampForwarder { targets }));

        let playback = controls.playback().ok_or_else(|| {
            Error::InvalidChain(format!("chain '{}' declares no source node", chain.name))
        })?;
        let transport = TransportController::new(buffer, playback);

        let mut graph = graph;
        graph.reset();

        info!(
            chain = %chain.name,
            nodes = graph.len(),
            parameters = store.len(),
            backend = %backend.name(),
            "signal graph built"
        );

        Ok(Self {
            name: chain.name.clone(),
            store,
            graph: graph.into_shared(),
            transport,
            taps: controls.take_taps(),
            backend,
            state: EngineState::Idle,
            autoplay: chain.autoplay,
        })
    }

    /// Clamp, store and forward a parameter value to its node.
    ///
    /// Never blocks on the render thread. Applies while paused too, so a resumed
    /// chain plays with the latest settings.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<ParameterChange> {
        let change = self.store.set(name, value)?;
        if change.clamped {
            debug!(
                parameter = name,
                requested = change.requested,
                stored = change.value,
                "value clamped"
            );
        }
        Ok(change)
    }

    /// Restore every parameter to its default.
    pub fn reset_parameters(&mut self) -> Result<()> {
        self.store.reset_all()
    }

    /// Start the backend, then schedule the looped buffer.
    ///
    /// Playback is only scheduled once the backend reports it is running. On
    /// failure the engine state becomes [`EngineState::Failed`] and the error is
    /// returned; a later call may retry.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_running() && self.backend.is_running() {
            return Ok(());
        }

        if let Err(e) = self.backend.start(Arc::clone(&self.graph)) {
            error!(chain = %self.name, backend = %self.backend.name(), "failed to start audio engine: {e}");
            self.state = EngineState::Failed(e.to_string());
            return Err(e);
        }

        if !self.backend.is_running() {
            let reason = format!("{} reported success but is not running", self.backend.name());
            error!(chain = %self.name, "{reason}");
            self.state = EngineState::Failed(reason.clone());
            return Err(Error::EngineStart(reason));
        }

        self.state = EngineState::Running;

        if self.autoplay {
            self.transport.start();
        } else {
            self.transport.arm();
        }

        info!(
            chain = %self.name,
            sample_rate = self.backend.sample_rate(),
            transport = ?self.transport.state(),
            "audio engine started"
        );
        Ok(())
    }

    /// [`start`](Self::start) with exponential back-off between attempts.
    pub fn start_with_retry(&mut self, policy: &RetryPolicy) -> Result<()> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 0;

        loop {
            let delay = policy.backoff(attempt);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }

            match self.start() {
                Ok(()) => return Ok(()),
                Err(e) if attempt + 1 >= attempts => return Err(e),
                Err(e) => {
                    warn!(attempt = attempt + 1, attempts, "engine start failed, retrying: {e}");
                }
            }
            attempt += 1;
        }
    }

    /// Stop playback and the backend. Safe to call any number of times, including
    /// before the first start.
    pub fn stop(&mut self) {
        let was_running = self.backend.is_running();

        if self.transport.state() != TransportState::Stopped {
            self.transport.stop();
        }
        self.backend.stop();

        if was_running {
            info!(chain = %self.name, "audio engine stopped");
        }
        self.state = EngineState::Idle;
    }

    pub fn play(&mut self) -> Result<TransportState> {
        self.require_running()?;
        Ok(self.transport.play())
    }

    pub fn pause(&mut self) -> TransportState {
        self.transport.pause()
    }

    pub fn toggle(&mut self) -> Result<TransportState> {
        if self.transport.state() != TransportState::Playing {
            self.require_running()?;
        }
        Ok(self.transport.toggle())
    }

    fn require_running(&self) -> Result<()> {
        if self.backend.is_running() {
            Ok(())
        } else {
            Err(Error::EngineNotRunning)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.store
    }

    pub fn parameter(&self, name: &str) -> Result<f32> {
        self.store.get(name)
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn engine_state(&self) -> &EngineState {
        &self.state
    }

    /// The buffer the transport plays.
    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        self.transport.buffer()
    }

    pub fn tap(&mut self, node: &str) -> Option<&mut NodeTap> {
        self.taps.iter_mut().find(|t| t.node() == node)
    }

    pub fn taps(&mut self) -> &mut [NodeTap] {
        &mut self.taps
    }

    pub fn sample_rate(&self) -> f64 {
        self.backend.sample_rate()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }
}

impl<B: AudioBackend> Drop for SignalGraphAdapter<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<B: AudioBackend> std::fmt::Debug for SignalGraphAdapter<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalGraphAdapter")
            .field("name", &self.name)
            .field("engine", &self.state)
            .field("transport", &self.transport.state())
            .field("parameters", &self.store)
            .finish()
    }
}
