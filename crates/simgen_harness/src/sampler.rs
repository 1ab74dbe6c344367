//! Deterministic parameter sampling.
//!
//! Each worker owns one [`ParameterSampler`] seeded from its assignment. For
//! a fixed seed the draw sequence is fully reproducible, which is what makes
//! datasets regenerable and golden-value tests possible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed spot price shared by every simulated row.
pub const SPOT: f64 = 205.0;

/// One unpriced simulated case.
///
/// Every draw is independent; no row depends on another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDraw {
    /// Spot price (constant, [`SPOT`]).
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Risk-free rate.
    pub rate: f64,
    /// Dividend yield.
    pub dividend: f64,
    /// Time to expiry in years.
    pub expiry_years: f64,
    /// Heston initial variance.
    pub v0: f64,
    /// Heston long-run variance.
    pub theta: f64,
    /// Heston mean-reversion speed.
    pub kappa: f64,
    /// Heston vol-of-vol.
    pub sigma: f64,
    /// Heston spot/variance correlation.
    pub rho: f64,
}

/// Seeded sampler drawing from fixed uniform ranges.
///
/// No domain validation is performed here: out-of-domain combinations (e.g.
/// Feller violations) are expected and handled downstream by the pricing
/// adapter, which records a sentinel price when the oracle fails.
///
/// # Examples
///
/// ```
/// use simgen_harness::ParameterSampler;
///
/// let mut a = ParameterSampler::from_seed(100_000);
/// let mut b = ParameterSampler::from_seed(100_000);
/// assert_eq!(a.next_draw(), b.next_draw());
/// ```
pub struct ParameterSampler {
    inner: StdRng,
    seed: u64,
}

impl ParameterSampler {
    /// Creates a sampler seeded for reproducibility.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed used for initialisation.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws the next parameter tuple.
    ///
    /// The draw order below is part of the reproducibility contract; do not
    /// reorder.
    pub fn next_draw(&mut self) -> ParameterDraw {
        let strike = self.inner.gen_range(5.0..405.0);
        let dividend = self.inner.gen_range(0.0..0.06);
        let rate = self.inner.gen_range(0.01..0.06);
        let expiry_years = self.inner.gen_range(0.003..3.0);
        let v0 = self.inner.gen_range(0.02..0.50);
        let theta = self.inner.gen_range(0.01..1.50);
        let kappa = self.inner.gen_range(0.01..2.00);
        let sigma = self.inner.gen_range(0.01..1.00);
        let rho = self.inner.gen_range(-1.00..0.00);

        ParameterDraw {
            spot: SPOT,
            strike,
            rate,
            dividend,
            expiry_years,
            v0,
            theta,
            kappa,
            sigma,
            rho,
        }
    }
}
