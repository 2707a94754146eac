//! Linear parameter ramps evaluated on the render thread.
//!
//! A ramp moves from its current value to a target over a caller-chosen duration.
//! Unlike a fixed smoothing time, every ramp instruction carries its own duration,
//! so a "ramp duration" parameter can change how later edits are applied.
//!
//! # Example
//!
//! ```
//! use conductor_core::LinearRamp;
//!
//! let mut freq = LinearRamp::new(440.0);
//! freq.ramp_to(880.0, 0.5, 1000.0); // 500 samples at 1 kHz
//!
//! let first = freq.next_sample();
//! assert!(first > 440.0 && first < 880.0);
//! ```

/// Linear ramp toward a target value.
///
/// Call [`next_sample()`](LinearRamp::next_sample) once per sample.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    step: f32,
    samples_remaining: u32,
}

impl LinearRamp {
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            samples_remaining: 0,
        }
    }

    /// Start a ramp of `seconds` toward `target`. A zero-length ramp jumps.
    #[inline]
    pub fn ramp_to(&mut self, target: f32, seconds: f32, sample_rate: f64) {
        let samples = (seconds.max(0.0) as f64 * sample_rate).round();

        if samples < 1.0 {
            self.set_immediate(target);
            return;
        }

        let samples = samples.min(u32::MAX as f64) as u32;
        self.target = target;
        self.samples_remaining = samples;
        self.step = (target - self.current) / samples as f32;
    }

    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.samples_remaining = 0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.step;
            self.samples_remaining -= 1;

            // Snap to avoid floating point drift
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }

        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.samples_remaining > 0
    }

    #[inline]
    pub fn samples_remaining(&self) -> u32 {
        self.samples_remaining
    }

    #[inline]
    pub fn skip_to_target(&mut self) {
        self.set_immediate(self.target);
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}
