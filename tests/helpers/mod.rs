//! Test helpers and fixtures for conductor integration tests.
//!
//! Fixtures are written to temporary directories: a WAV through `hound`, and an
//! AIFF assembled by hand since no dev-dependency writes one.

#![allow(dead_code)]

use conductor::core::SampleBuffer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: f64 = 44100.0;

/// Values below this are considered silent (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// Generate a sine wave at the given frequency.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// The same sine as 16-bit PCM at half scale.
pub fn generate_sine_i16(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<i16> {
    generate_sine(frequency, sample_rate, num_samples)
        .into_iter()
        .map(|s| (s * 16384.0) as i16)
        .collect()
}

/// A one-second mono drum stand-in, already decoded.
pub fn test_buffer() -> Arc<SampleBuffer> {
    let samples: Vec<f32> = generate_sine(220.0, TEST_SAMPLE_RATE, TEST_SAMPLE_RATE as usize)
        .into_iter()
        .map(|s| s * 0.5)
        .collect();
    Arc::new(SampleBuffer::new(TEST_SAMPLE_RATE as u32, 1, samples).expect("valid buffer"))
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert that a signal is approximately silent.
pub fn assert_silence(samples: &[f32]) {
    let max = peak(samples);
    assert!(
        max <= SILENCE_THRESHOLD,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert that a signal has content.
pub fn assert_has_audio(samples: &[f32], min_rms: f32) {
    let r = rms(samples);
    assert!(
        r >= min_rms,
        "Expected audio content with RMS >= {}, but RMS was {}",
        min_rms,
        r
    );
}

/// Write interleaved 16-bit PCM as a WAV file.
pub fn save_wav_pcm16(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &s in samples {
        writer.write_sample(s).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

/// 80-bit IEEE extended encoding of an integral sample rate, as AIFF stores it.
fn extended_rate(rate: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if rate == 0 {
        return out;
    }
    let e = 31 - rate.leading_zeros();
    let exponent = (16383 + e) as u16;
    let mantissa = (rate as u64) << (63 - e);
    out[..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}

/// A complete AIFF file holding interleaved 16-bit big-endian PCM.
pub fn aiff_pcm16(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let frames = (samples.len() / channels as usize) as u32;
    let data_len = (samples.len() * 2) as u32;

    let mut comm = Vec::with_capacity(18);
    comm.extend_from_slice(&channels.to_be_bytes());
    comm.extend_from_slice(&frames.to_be_bytes());
    comm.extend_from_slice(&16u16.to_be_bytes());
    comm.extend_from_slice(&extended_rate(sample_rate));

    let mut ssnd = Vec::with_capacity(8 + data_len as usize);
    ssnd.extend_from_slice(&0u32.to_be_bytes()); // offset
    ssnd.extend_from_slice(&0u32.to_be_bytes()); // block size
    for s in samples {
        ssnd.extend_from_slice(&s.to_be_bytes());
    }

    let form_len = 4 + (8 + comm.len()) + (8 + ssnd.len());
    let mut out = Vec::with_capacity(8 + form_len);
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&(form_len as u32).to_be_bytes());
    out.extend_from_slice(b"AIFF");
    out.extend_from_slice(b"COMM");
    out.extend_from_slice(&(comm.len() as u32).to_be_bytes());
    out.extend_from_slice(&comm);
    out.extend_from_slice(b"SSND");
    out.extend_from_slice(&(ssnd.len() as u32).to_be_bytes());
    out.extend_from_slice(&ssnd);
    out
}

/// An asset root with `Samples/beat.aiff` holding `contents`.
pub fn asset_dir_with(contents: &[u8]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let samples = dir.path().join("Samples");
    std::fs::create_dir_all(&samples).expect("create Samples");
    std::fs::write(samples.join("beat.aiff"), contents).expect("write beat.aiff");
    dir
}

/// An asset root with a half-second stereo beat at 44.1kHz.
pub fn asset_dir() -> TempDir {
    let mono = generate_sine_i16(110.0, TEST_SAMPLE_RATE, TEST_SAMPLE_RATE as usize / 2);
    let stereo: Vec<i16> = mono.iter().flat_map(|&s| [s, s]).collect();
    asset_dir_with(&aiff_pcm16(TEST_SAMPLE_RATE as u32, 2, &stereo))
}
