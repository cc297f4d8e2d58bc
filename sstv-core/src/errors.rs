//! Error types for decoder construction and primitive design failures.

use thiserror::Error;

/// Top-level error type for all SSTV core operations.
#[derive(Debug, Error)]
pub enum SstvError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("DSP error: {0}")]
    Dsp(#[from] DspError),
}

/// Errors raised while constructing a `Decoder` or its mode table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid sample rate: {rate} Hz (must be > 0)")]
    InvalidSampleRate { rate: f64 },

    #[error("unknown SSTV mode: {name}")]
    UnknownMode { name: String },

    #[error("framebuffer dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

/// Errors raised by DSP primitive constructors.
#[derive(Debug, Error)]
pub enum DspError {
    #[error("filter design failed: {reason}")]
    FilterDesignFailed { reason: String },
}

/// Result type alias for SSTV core operations.
pub type Result<T> = std::result::Result<T, SstvError>;
