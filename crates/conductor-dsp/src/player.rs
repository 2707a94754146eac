//! In-memory sample player with variable speed.

use arc_swap::ArcSwapOption;
use conductor_core::{
    get_param_or, AtomicFlag, AudioNode, NodeParams, NodeRegistryError, ParamControl,
    PlaybackTarget, RampedParam, SampleBuffer,
};
use std::sync::Arc;

/// Slowest and fastest playback rates a chain should expose.
pub const MIN_RATE: f32 = 0.3125;
pub const MAX_RATE: f32 = 5.0;

/// Transport side of a [`PlayerNode`], shared with the control thread.
///
/// The scheduled buffer is swapped in atomically, so the render thread never
/// waits on a lock to read it.
#[derive(Default)]
pub struct PlayerControl {
    buffer: ArcSwapOption<SampleBuffer>,
    playing: AtomicFlag,
    looping: AtomicFlag,
    rewind: AtomicFlag,
}

impl PlayerControl {
    pub fn buffer(&self) -> Option<Arc<SampleBuffer>> {
        self.buffer.load_full()
    }

    pub fn is_looping(&self) -> bool {
        self.looping.get()
    }
}

impl PlaybackTarget for PlayerControl {
    fn schedule(&self, buffer: Arc<SampleBuffer>, looping: bool) {
        self.buffer.store(Some(buffer));
        self.looping.set(looping);
        self.rewind.set(true);
    }

    fn play(&self) {
        self.playing.set(true);
    }

    fn pause(&self) {
        self.playing.set(false);
    }

    fn stop(&self) {
        self.playing.set(false);
        self.rewind.set(true);
    }

    fn is_playing(&self) -> bool {
        self.playing.get()
    }
}

/// Plays a scheduled buffer, mixed down to mono, at a ramped rate.
///
/// A rate of 1 plays at the buffer's own sample rate regardless of the engine's.
pub struct PlayerNode {
    control: Arc<PlayerControl>,
    rate: RampedParam,
    volume: RampedParam,
    /// Read head in source frames.
    position: f64,
    sample_rate: f64,
}

impl PlayerNode {
    pub fn new(rate: f32, volume: f32) -> Self {
        Self {
            control: Arc::new(PlayerControl::default()),
            rate: RampedParam::new(rate, crate::DEFAULT_SR),
            volume: RampedParam::new(volume, crate::DEFAULT_SR),
            position: 0.0,
            sample_rate: crate::DEFAULT_SR,
        }
    }

    pub fn from_params(params: &NodeParams) -> Result<Self, NodeRegistryError> {
        let rate = get_param_or(params, "rate", 1.0, |v| v.as_f32())?;
        let volume = get_param_or(params, "volume", 1.0, |v| v.as_f32())?;
        Ok(Self::new(rate, volume))
    }

    pub fn control(&self) -> Arc<PlayerControl> {
        Arc::clone(&self.control)
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}

impl AudioNode for PlayerNode {
    fn kind(&self) -> &'static str {
        "player"
    }

    fn inputs(&self) -> usize {
        0
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.rate.set_sample_rate(sample_rate);
        self.volume.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.position = 0.0;
        self.rate.reset();
        self.volume.reset();
    }

    #[inline]
    fn tick(&mut self, _input: &[f32]) -> f32 {
        // Ramps advance even while paused
        let rate = self.rate.next_sample().max(0.0) as f64;
        let volume = self.volume.next_sample();

        if self.control.rewind.swap(false) {
            self.position = 0.0;
        }

        if !self.control.playing.get() {
            return 0.0;
        }

        let guard = self.control.buffer.load();
        let Some(buffer) = &*guard else {
            return 0.0;
        };

        let frames = buffer.frames();
        let looping = self.control.looping.get();

        if self.position >= frames as f64 {
            if looping {
                self.position %= frames as f64;
            } else {
                self.control.playing.set(false);
                return 0.0;
            }
        }

        let index = self.position as usize;
        let frac = (self.position - index as f64) as f32;
        let next = match index + 1 {
            n if n < frames => n,
            _ if looping => 0,
            n => n,
        };

        let a = buffer.frame_mono(index);
        let b = buffer.frame_mono(next);
        let out = (a + (b - a) * frac) * volume;

        self.position += rate * buffer.sample_rate() as f64 / self.sample_rate;

        out
    }

    fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
        vec![("rate", self.rate.control()), ("volume", self.volume.control())]
    }

    fn playback(&self) -> Option<Arc<dyn PlaybackTarget>> {
        Some(self.control.clone())
    }
}
