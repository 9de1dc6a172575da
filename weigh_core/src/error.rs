use thiserror::Error;

/// Failures that can surface from the scan plumbing around the core.
///
/// The stabilizer and decoder themselves never raise errors; rejected input
/// degrades to `StabilizerEvent::None` / `Option::None`.
#[derive(Debug, Error, Clone)]
pub enum WeighError {
    #[error("advertisement source error: {0}")]
    Source(String),
    #[error("timeout waiting for advertisement")]
    Timeout,
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
