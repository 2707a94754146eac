//! Engine backends: whatever pulls samples out of a [`SharedGraph`].

use crate::graph::SharedGraph;
use crate::Result;

/// Something that can run a signal graph.
///
/// `start` must not return `Ok` until the backend is actually pulling audio,
/// because callers schedule playback right after it succeeds.
pub trait AudioBackend: Send {
    fn start(&mut self, graph: SharedGraph) -> Result<()>;

    /// Idempotent. Safe on a backend that never started.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    fn sample_rate(&self) -> f64;

    fn name(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("backend")
            .to_string()
    }
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn start(&mut self, graph: SharedGraph) -> Result<()> {
        (**self).start(graph)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn sample_rate(&self) -> f64 {
        (**self).sample_rate()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
