//! CPAL audio output.

use crate::backend::AudioBackend;
use crate::config::EngineConfig;
use crate::graph::SharedGraph;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, warn};

/// Wrapper to hold a `cpal::Stream` in a `Send` context.
///
/// `cpal::Stream` is `!Send` due to platform internals. The stream is owned by
/// a `CpalBackend`, which only the adapter's owner touches, and is dropped on stop.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

// SAFETY: never accessed concurrently; it lives until `stop` or drop.
unsafe impl Send for StreamHandle {}

pub struct CpalBackend {
    config: EngineConfig,
    sample_rate: f64,
    channels: usize,
    stream: Option<StreamHandle>,
}

impl CpalBackend {
    /// Opens the configured device to learn its rate. Does not start a stream.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let device = get_device(config.output_device)?;
        let output_config = device.default_output_config()?;

        Ok(Self {
            config: config.clone(),
            sample_rate: output_config.sample_rate().0 as f64,
            channels: output_config.channels() as usize,
            stream: None,
        })
    }

    /// Channels of the open stream, or the device default before start.
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn device_name(&self) -> Result<String> {
        Ok(get_device(self.config.output_device)?.name()?)
    }

    pub fn list_devices() -> Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, d)| Ok(format!("{i}: {}", d.name()?)))
            .collect()
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self, graph: SharedGraph) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let device = get_device(self.config.output_device)?;
        let default = device.default_output_config()?;
        let sample_format = default.sample_format();

        let supported: Vec<u16> = device
            .supported_output_configs()?
            .filter(|c| {
                c.sample_format() == sample_format
                    && c.min_sample_rate() <= default.sample_rate()
                    && c.max_sample_rate() >= default.sample_rate()
            })
            .map(|c| c.channels())
            .collect();
        let channels = self.config.stream_channels(&supported, default.channels());
        if channels as usize != self.config.channels {
            warn!(
                requested = self.config.channels,
                using = channels,
                "device does not offer the configured channel count"
            );
        }

        let mut stream_config = default.config();
        stream_config.channels = channels;

        self.sample_rate = stream_config.sample_rate.0 as f64;
        self.channels = channels as usize;
        graph.lock().set_sample_rate(self.sample_rate);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, graph)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, graph)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, graph)?,
            format => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };

        stream.play()?;
        self.stream = Some(StreamHandle(stream));
        info!(sample_rate = self.sample_rate, channels = self.channels, "audio output started");

        Ok(())
    }

    fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("audio output stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn name(&self) -> String {
        "cpal".into()
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    graph: SharedGraph,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    // Grows on the first callback, then stable
    let mut stereo = Vec::<f32>::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let frames = data.len() / channels;
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                // Never block the device thread on the control side
                let Some(mut graph) = graph.try_lock() else {
                    return false;
                };

                let needed = frames * 2;
                if stereo.len() < needed {
                    stereo.resize(needed, 0.0);
                }
                graph.process(&mut stereo[..needed]);
                write_output(data, channels, &stereo[..needed]);
                true
            }));

            if !matches!(result, Ok(true)) {
                output_silence(data);
            }
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    Ok(stream)
}

/// Convert stereo f32 to the device format.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    stereo: &[f32],
) {
    for (i, sample) in data.iter_mut().enumerate() {
        let frame = i / channels;
        let ch = i % channels;
        let value = match channels {
            1 => stereo[frame * 2],
            _ if ch < 2 => stereo[frame * 2 + ch],
            _ => 0.0,
        };
        *sample = T::from_sample(value);
    }
}

#[inline]
fn output_silence<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T]) {
    for sample in data.iter_mut() {
        *sample = T::from_sample(0.0);
    }
}
