//! In-memory PCM sample buffer.

use crate::{Error, Result};

/// Decoded audio, interleaved `f32` in `[-1, 1]`.
///
/// Format details (rate, channel count, bit depth) are whatever the source file
/// declared; nothing is resampled at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: u16,
    bits_per_sample: Option<u32>,
    samples: Vec<f32>,
}

impl SampleBuffer {
    /// Fails on an empty buffer, zero channels, a zero sample rate, or a sample
    /// count that is not a whole number of frames.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer("sample rate is zero".into()));
        }
        if channels == 0 {
            return Err(Error::InvalidBuffer("channel count is zero".into()));
        }
        if samples.is_empty() {
            return Err(Error::InvalidBuffer("buffer has no frames".into()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(Error::InvalidBuffer(format!(
                "{} samples is not a multiple of {channels} channels",
                samples.len()
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
            bits_per_sample: None,
            samples,
        })
    }

    pub fn with_bits_per_sample(mut self, bits: u32) -> Self {
        self.bits_per_sample = Some(bits);
        self
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    #[inline]
    pub fn bits_per_sample(&self) -> Option<u32> {
        self.bits_per_sample
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Average of all channels at `frame`. Out of range reads are silent.
    #[inline]
    pub fn frame_mono(&self, frame: usize) -> f32 {
        let channels = self.channels as usize;
        let start = frame * channels;
        match self.samples.get(start..start + channels) {
            Some(frame) => frame.iter().sum::<f32>() / channels as f32,
            None => 0.0,
        }
    }
}
