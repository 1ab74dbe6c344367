//! Error types for the analytic pricing engine.

use thiserror::Error;

use crate::heston::HestonError;

/// Analytic engine errors.
///
/// # Examples
///
/// ```
/// use simgen_models::analytic::EngineError;
///
/// let err = EngineError::InvalidStrike(-5.0);
/// assert!(err.to_string().contains("-5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Spot must be positive.
    #[error("invalid spot: S = {0} (must be positive)")]
    InvalidSpot(f64),

    /// Strike must be positive.
    #[error("invalid strike: K = {0} (must be positive)")]
    InvalidStrike(f64),

    /// Time to expiry must be positive.
    #[error("invalid expiry: T = {0} (must be positive)")]
    InvalidExpiry(f64),

    /// Heston parameter validation failed.
    #[error(transparent)]
    Params(#[from] HestonError),

    /// The quadrature produced a NaN or infinite value.
    #[error("quadrature returned a non-finite price")]
    NonFinite,
}
