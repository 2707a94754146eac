//! Audio engine configuration.

use crate::{Error, Result};

/// Configuration for the audio engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Offline rendering rate. Device backends use the device's own rate.
    pub sample_rate: f64,
    /// Output device index, `None` for the host default.
    pub output_device: Option<usize>,
    /// Channels to open the device with, if it offers that many.
    pub channels: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            output_device: None,
            channels: 2,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.channels == 0 {
            return Err(Error::InvalidConfig("channels must be at least 1".into()));
        }
        Ok(())
    }

    /// Channel count for an output stream: the configured count when the device
    /// supports it, otherwise the device's default.
    pub fn stream_channels(&self, supported: &[u16], device_default: u16) -> u16 {
        match u16::try_from(self.channels) {
            Ok(channels) if supported.contains(&channels) => channels,
            _ => device_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 44100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let low = EngineConfig {
            sample_rate: 100.0,
            ..Default::default()
        };
        assert!(matches!(low.validate(), Err(Error::InvalidConfig(_))));

        let silent = EngineConfig {
            channels: 0,
            ..Default::default()
        };
        assert!(silent.validate().is_err());

        let nan = EngineConfig {
            sample_rate: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_stream_channels() {
        let stereo = EngineConfig::default();
        assert_eq!(stereo.stream_channels(&[1, 2, 6], 6), 2);

        let mono = EngineConfig {
            channels: 1,
            ..Default::default()
        };
        assert_eq!(mono.stream_channels(&[1, 2], 2), 1);

        // Unsupported counts fall back to the device default
        let octo = EngineConfig {
            channels: 8,
            ..Default::default()
        };
        assert_eq!(octo.stream_channels(&[2], 2), 2);
        assert_eq!(octo.stream_channels(&[], 2), 2);
    }
}
