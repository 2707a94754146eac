//! Asset lookup and sample decoding.
//!
//! - [`AssetBundle`]: resolves relative asset paths under a root directory
//! - [`load_sample`]: decodes AIFF and WAV PCM into a [`SampleBuffer`](conductor_core::SampleBuffer)

pub mod error;
pub use error::{Error, Result};

mod asset;
pub use asset::{AssetBundle, ASSETS_ENV, DEFAULT_ASSETS_DIR, DEFAULT_SAMPLE_PATH};

mod load;
pub use load::load_sample;
