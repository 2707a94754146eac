//! Decoding sample files into memory.

use crate::{Error, Result};
use conductor_core::SampleBuffer;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer as DecodeBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode an AIFF or WAV file to interleaved f32.
///
/// Never returns an empty buffer: a missing file, an undecodable file and a file
/// with no frames are all errors.
pub fn load_sample(path: impl AsRef<Path>) -> Result<SampleBuffer> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::AssetNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoTrack(path.to_path_buf()))?;

    let track_id = track.id;
    let params = track.codec_params.clone();
    let invalid = |reason: &str| Error::InvalidFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let sample_rate = params.sample_rate.ok_or_else(|| invalid("unknown sample rate"))?;
    let channels = params
        .channels
        .map(|c| c.count())
        .ok_or_else(|| invalid("unknown channel layout"))?;
    let channels = u16::try_from(channels).map_err(|_| invalid("too many channels"))?;

    let mut decoder = symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    let mut scratch: Option<DecodeBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let frames = decoded.capacity() as u64;
                let spec = *decoded.spec();
                let needed = decoded.capacity() * spec.channels.count();

                if scratch.as_ref().map_or(true, |b| b.capacity() < needed) {
                    scratch = Some(DecodeBuffer::new(frames, spec));
                }
                if let Some(buf) = scratch.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(path = %path.display(), "skipping undecodable packet: {reason}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if samples.is_empty() {
        return Err(Error::EmptyBuffer(path.to_path_buf()));
    }

    let mut buffer = SampleBuffer::new(sample_rate, channels, samples)?;
    if let Some(bits) = params.bits_per_sample {
        buffer = buffer.with_bits_per_sample(bits);
    }

    debug!(
        path = %path.display(),
        sample_rate,
        channels,
        frames = buffer.frames(),
        "sample loaded"
    );

    Ok(buffer)
}
