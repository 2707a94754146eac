//! Control-thread handles into running nodes.
//!
//! The control side never touches node state. It publishes ramp instructions
//! through a [`ParamControl`] and transport commands through a
//! [`PlaybackTarget`]; the render thread picks them up on its next sample.

use crate::buffer::SampleBuffer;
use crate::lockfree::{AtomicFloat, Generation};
use crate::ramp::LinearRamp;
use std::sync::Arc;

/// Lock-free ramp instruction for one node parameter.
///
/// Writers publish `(target, seconds)` and bump the generation; the render thread
/// notices the new generation and starts the ramp.
#[derive(Debug)]
pub struct ParamControl {
    target: AtomicFloat,
    seconds: AtomicFloat,
    generation: Generation,
}

impl ParamControl {
    pub fn new(initial: f32) -> Self {
        Self {
            target: AtomicFloat::new(initial),
            seconds: AtomicFloat::new(0.0),
            generation: Generation::new(),
        }
    }

    pub fn shared(initial: f32) -> Arc<Self> {
        Arc::new(Self::new(initial))
    }

    /// Never blocks.
    #[inline]
    pub fn ramp_to(&self, target: f32, seconds: f32) {
        self.target.set(target);
        self.seconds.set(seconds.max(0.0));
        self.generation.bump();
    }

    #[inline]
    pub fn set_immediate(&self, value: f32) {
        self.ramp_to(value, 0.0);
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target.get()
    }

    #[inline]
    pub fn seconds(&self) -> f32 {
        self.seconds.get()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

/// Render-side view of a [`ParamControl`].
///
/// Owns the [`LinearRamp`] and restarts it whenever a new instruction arrives.
#[derive(Debug, Clone)]
pub struct RampedParam {
    control: Arc<ParamControl>,
    ramp: LinearRamp,
    seen: u64,
    sample_rate: f64,
}

impl RampedParam {
    pub fn new(initial: f32, sample_rate: f64) -> Self {
        let control = ParamControl::shared(initial);
        let seen = control.generation();
        Self {
            control,
            ramp: LinearRamp::new(initial),
            seen,
            sample_rate,
        }
    }

    pub fn control(&self) -> Arc<ParamControl> {
        Arc::clone(&self.control)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Jump to the control's current target.
    pub fn reset(&mut self) {
        self.seen = self.control.generation();
        self.ramp.set_immediate(self.control.target());
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let generation = self.control.generation();
        if generation != self.seen {
            self.seen = generation;
            self.ramp.ramp_to(
                self.control.target(),
                self.control.seconds(),
                self.sample_rate,
            );
        }
        self.ramp.next_sample()
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.ramp.current()
    }
}

/// Transport commands accepted by a source node.
pub trait PlaybackTarget: Send + Sync {
    /// Replace the scheduled buffer and rewind.
    fn schedule(&self, buffer: Arc<SampleBuffer>, looping: bool);
    fn play(&self);
    fn pause(&self);
    /// Pause and rewind to the start of the buffer.
    fn stop(&self);
    fn is_playing(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_instruction_is_picked_up() {
        let mut param = RampedParam::new(440.0, 1000.0);
        let control = param.control();

        assert_eq!(param.next_sample(), 440.0);

        control.ramp_to(880.0, 0.5);
        let first = param.next_sample();
        assert!(first > 440.0 && first < 880.0);

        for _ in 0..600 {
            param.next_sample();
        }
        assert_eq!(param.current(), 880.0);
    }

    #[test]
    fn test_set_immediate_jumps() {
        let mut param = RampedParam::new(1.0, 48000.0);
        param.control().set_immediate(0.3125);
        assert_eq!(param.next_sample(), 0.3125);
    }

    #[test]
    fn test_negative_ramp_time_is_zero() {
        let control = ParamControl::new(0.0);
        control.ramp_to(1.0, -2.0);
        assert_eq!(control.seconds(), 0.0);
        assert_eq!(control.generation(), 1);
    }

    #[test]
    fn test_reset_skips_pending_ramp() {
        let mut param = RampedParam::new(0.0, 1000.0);
        param.control().ramp_to(1.0, 10.0);
        param.reset();
        assert_eq!(param.next_sample(), 1.0);
    }
}
