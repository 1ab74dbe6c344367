//! Heston stochastic volatility parameters.
//!
//! The Heston model is described by the SDE pair:
//! ```text
//! dS = (r - q) * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + sigma * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//!
//! ## Feller Condition
//!
//! `2 * kappa * theta > sigma^2` is sufficient for the variance process to
//! stay strictly positive. The simulation harness deliberately samples
//! parameter sets that violate it; [`HestonParams::satisfies_feller`] is a
//! diagnostic, not a constructor constraint.

use thiserror::Error;

/// Heston parameter validation errors.
///
/// # Examples
///
/// ```
/// use simgen_models::heston::HestonError;
///
/// let err = HestonError::InvalidRho(1.5);
/// assert!(err.to_string().contains("1.5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Initial variance must be positive.
    #[error("invalid initial variance: v0 = {0} (must be positive)")]
    InvalidV0(f64),

    /// Long-run variance must be positive.
    #[error("invalid long-run variance: theta = {0} (must be positive)")]
    InvalidTheta(f64),

    /// Mean-reversion speed must be positive.
    #[error("invalid mean-reversion speed: kappa = {0} (must be positive)")]
    InvalidKappa(f64),

    /// Vol-of-vol must be positive.
    #[error("invalid vol-of-vol: sigma = {0} (must be positive)")]
    InvalidSigma(f64),

    /// Correlation must lie in [-1, 1].
    #[error("invalid correlation: rho = {0} (must be in [-1, 1])")]
    InvalidRho(f64),
}

/// Heston model parameters.
///
/// All five fields are rebuilt from a fresh parameter draw on every pricing
/// call; nothing in this struct is reused across rows.
///
/// # Examples
///
/// ```
/// use simgen_models::heston::HestonParams;
///
/// let params = HestonParams::new(0.04, 0.04, 1.5, 0.3, -0.7).unwrap();
/// assert!(params.satisfies_feller());
///
/// // 2 * 0.5 * 0.04 = 0.04 < 0.5^2 = 0.25: Feller violated, still valid.
/// let stressed = HestonParams::new(0.04, 0.04, 0.5, 0.5, -0.7).unwrap();
/// assert!(!stressed.satisfies_feller());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonParams {
    /// Initial variance (v0 > 0).
    pub v0: f64,
    /// Long-run variance (theta > 0).
    pub theta: f64,
    /// Mean-reversion speed (kappa > 0).
    pub kappa: f64,
    /// Volatility of variance (sigma > 0).
    pub sigma: f64,
    /// Spot/variance correlation (-1 <= rho <= 1).
    pub rho: f64,
}

impl HestonParams {
    /// Creates a validated parameter set.
    ///
    /// # Examples
    ///
    /// ```
    /// use simgen_models::heston::{HestonError, HestonParams};
    ///
    /// assert!(HestonParams::new(0.04, 0.04, 1.5, 0.3, -0.7).is_ok());
    /// assert!(matches!(
    ///     HestonParams::new(-0.04, 0.04, 1.5, 0.3, -0.7),
    ///     Err(HestonError::InvalidV0(_))
    /// ));
    /// ```
    pub fn new(
        v0: f64,
        theta: f64,
        kappa: f64,
        sigma: f64,
        rho: f64,
    ) -> Result<Self, HestonError> {
        let params = Self {
            v0,
            theta,
            kappa,
            sigma,
            rho,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validates the parameter set.
    ///
    /// Positivity for the variance-process parameters, `rho` in [-1, 1].
    /// The Feller condition is intentionally NOT enforced here.
    pub fn validate(&self) -> Result<(), HestonError> {
        if !(self.v0 > 0.0) {
            return Err(HestonError::InvalidV0(self.v0));
        }
        if !(self.theta > 0.0) {
            return Err(HestonError::InvalidTheta(self.theta));
        }
        if !(self.kappa > 0.0) {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if !(self.sigma > 0.0) {
            return Err(HestonError::InvalidSigma(self.sigma));
        }
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        Ok(())
    }

    /// Checks the Feller condition `2 * kappa * theta > sigma^2`.
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.sigma * self.sigma
    }

    /// Feller ratio `2 * kappa * theta / sigma^2`.
    ///
    /// Values above 1.0 satisfy the Feller condition.
    pub fn feller_ratio(&self) -> f64 {
        let denominator = self.sigma * self.sigma;
        if denominator > 0.0 {
            2.0 * self.kappa * self.theta / denominator
        } else {
            f64::INFINITY
        }
    }
}
