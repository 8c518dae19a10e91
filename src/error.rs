//! Error module for the Rusty Raster library.
use thiserror::Error;

/// Error types for the library.
#[derive(Debug, PartialEq, Error)]
pub enum SimError {
    /// Error for a missing or invalid distribution parameter, e.g., a gamma sampler without scaling factor.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Error for a malformed rate schedule, e.g., negative rates or mismatched lengths.
    #[error("Invalid rate schedule: {0}")]
    InvalidScheduleError(String),
    /// Error for a tuning fit without enough (direction, rate) pairs.
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),
    /// Error for statistics requested on zero trials.
    #[error("Statistics requested on an empty raster set")]
    EmptyRasterSetError,
    /// Error for stimulus fields of different shapes.
    #[error("Stimulus shape mismatch: {0}")]
    StimulusShapeError(String),
    /// Error for rates requested before any rate source was bound.
    #[error("No rate source assigned to neuron {0}")]
    UnassignedRateSourceError(String),
    /// Error for binding a rate source twice.
    #[error("Rate source already assigned to neuron {0}")]
    RateSourceAlreadyBoundError(String),
    /// Error for invalid parameters, e.g., a zero bin size.
    #[error("Invalid parameters: {0}")]
    InvalidParameter(String),
    /// Error while encoding a raster record.
    #[error("Codec error: {0}")]
    CodecError(String),
    /// Error for I/O operations.
    #[error("I/O error: {0}")]
    IOError(String),
}
