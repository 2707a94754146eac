//! The processing-stage interface implemented by every node kind.

use crate::control::{ParamControl, PlaybackTarget};
use std::sync::Arc;

/// One mono processing stage in a signal chain.
///
/// Nodes are built on the control thread, then owned by the render thread for
/// the rest of their life. Everything the control thread may change afterwards
/// goes through the handles returned by [`controls`](AudioNode::controls) and
/// [`playback`](AudioNode::playback).
pub trait AudioNode: Send {
    /// Registry name of this node kind.
    fn kind(&self) -> &'static str;

    /// Number of mono input ports.
    fn inputs(&self) -> usize;

    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Clear internal state (filter memories, envelopes, read heads).
    fn reset(&mut self);

    /// Process one frame. `input.len() == self.inputs()`.
    fn tick(&mut self, input: &[f32]) -> f32;

    /// Named parameter handles.
    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        Vec::new()
    }

    /// Transport handle, for nodes that play a buffer.
    fn playback(&self) -> Option<Arc<dyn PlaybackTarget>> {
        None
    }
}
