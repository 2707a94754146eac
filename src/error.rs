//! Centralized error type for the conductor umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] conductor_core::Error),

    #[error("Sampler: {0}")]
    Sampler(#[from] conductor_sampler::Error),

    #[error("No signal chain configured")]
    MissingChain,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_arrive_through_sampler() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: Error = conductor_sampler::Error::from(io).into();
        assert!(matches!(err, Error::Sampler(conductor_sampler::Error::Io(_))));
    }
}
