//! Deterministic backend that renders on demand instead of on a device clock.

use crate::backend::AudioBackend;
use crate::config::EngineConfig;
use crate::graph::SharedGraph;
use crate::{Error, Result};
use tracing::debug;

/// Renders the graph when asked. Used by tests and for bouncing audio to memory.
///
/// Can be told to refuse to start, which exercises the adapter's failure path
/// without a sound card.
pub struct OfflineBackend {
    sample_rate: f64,
    graph: Option<SharedGraph>,
    failures_left: usize,
    failure: String,
    starts: usize,
}

impl OfflineBackend {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            graph: None,
            failures_left: 0,
            failure: String::new(),
            starts: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.sample_rate))
    }

    /// A backend whose every start attempt fails with `reason`.
    pub fn failing(sample_rate: f64, reason: impl Into<String>) -> Self {
        Self::new(sample_rate).fail_first(usize::MAX, reason)
    }

    /// Fail the first `attempts` starts, then behave normally.
    pub fn fail_first(mut self, attempts: usize, reason: impl Into<String>) -> Self {
        self.failures_left = attempts;
        self.failure = reason.into();
        self
    }

    /// Start attempts so far, failed ones included.
    pub fn start_attempts(&self) -> usize {
        self.starts
    }

    /// Render `frames` frames of interleaved stereo. Silence while stopped.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * 2];
        if let Some(graph) = &self.graph {
            graph.lock().process(&mut out);
        }
        out
    }

    /// Render into an existing interleaved stereo buffer.
    pub fn render_into(&mut self, out: &mut [f32]) {
        match &self.graph {
            Some(graph) => graph.lock().process(out),
            None => out.fill(0.0),
        }
    }
}

impl AudioBackend for OfflineBackend {
    fn start(&mut self, graph: SharedGraph) -> Result<()> {
        self.starts += 1;

        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(Error::EngineStart(self.failure.clone()));
        }

        if self.graph.is_some() {
            return Ok(());
        }

        graph.lock().set_sample_rate(self.sample_rate);
        self.graph = Some(graph);
        debug!(sample_rate = self.sample_rate, "offline backend started");
        Ok(())
    }

    fn stop(&mut self) {
        if self.graph.take().is_some() {
            debug!("offline backend stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.graph.is_some()
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn name(&self) -> String {
        "offline".into()
    }
}
