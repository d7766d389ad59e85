//! Error taxonomy for the fingerprinting engine.
//!
//! Every failure is deterministic and detected at the offending call;
//! nothing in the engine is transient, so there is no retry surface.

use thiserror::Error;

/// Errors produced by hash computation and comparison.
#[derive(Debug, Error)]
pub enum HashError {
    /// The input buffer is empty, has zero dimensions, or its payload
    /// does not match its declared shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two hashes of different variants (or incompatible lengths or
    /// parameters) were compared. Cross-variant distances are
    /// meaningless and never returned as numbers.
    #[error("variant mismatch: {0}")]
    VariantMismatch(String),

    /// A configuration value is outside the supported bounds for its
    /// transform.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HashError>;
