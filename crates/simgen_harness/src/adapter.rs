//! Pricing adapter: oracle trait and per-worker pricing session.
//!
//! Constructing the oracle's full evaluation context is expensive relative
//! to re-solving with new model parameters, so the session splits state into
//! two tiers:
//! - **reused across calls, cheap to mutate**: flat market quotes updated in
//!   place by [`PricingSession::set_market`];
//! - **rebuilt every call**: the Heston parameter set and the contract terms
//!   (strike, expiry, option side), assembled fresh per request and
//!   discarded afterwards.
//!
//! The valuation date is anchored exactly once per session (one session per
//! worker process) and never changes; all expiries are resolved against it.

use simgen_core::market::MarketQuotes;
use simgen_core::types::{Calendar, Date, DateAdvance, DayCountConvention, OptionKind};
use simgen_models::analytic::{EngineError, HestonAnalyticEngine, VanillaTerms};
use simgen_models::heston::HestonParams;
use thiserror::Error;
use tracing::debug;

use crate::sampler::{ParameterDraw, SPOT};

/// Days per year used to resolve a year fraction into a day offset.
const DAYS_PER_YEAR: f64 = 365.0;

/// Failure raised by a pricing oracle for a single request.
///
/// The session converts every variant to the NaN sentinel; an oracle error
/// can never escape into the worker loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The parameter combination was outside the oracle's domain.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The oracle's numerics failed on valid-looking inputs.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

/// Fully specified pricing request for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRequest {
    /// Spot quote.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Risk-free rate quote.
    pub rate: f64,
    /// Dividend yield quote.
    pub dividend: f64,
    /// Valuation date the expiry is measured from.
    pub valuation: Date,
    /// Contract expiry date.
    pub expiry: Date,
    /// Day count convention for the expiry year fraction.
    pub day_count: DayCountConvention,
    /// Heston model parameters.
    pub heston: HestonParams,
    /// Call or put.
    pub kind: OptionKind,
}

/// External pricing oracle.
///
/// Implementations are treated as opaque, potentially slow, and occasionally
/// failing; the harness never inspects how a price was produced.
pub trait Oracle {
    /// Prices one request, or reports a typed failure.
    fn price(&self, request: &PriceRequest) -> Result<f64, OracleError>;
}

impl Oracle for HestonAnalyticEngine {
    fn price(&self, request: &PriceRequest) -> Result<f64, OracleError> {
        let terms = VanillaTerms {
            strike: request.strike,
            expiry: request.day_count.year_fraction(request.valuation, request.expiry),
            kind: request.kind,
        };
        self.price_vanilla(
            request.spot,
            request.rate,
            request.dividend,
            &terms,
            &request.heston,
        )
        .map_err(|err| match err {
            EngineError::Params(e) => OracleError::InvalidParameters(e.to_string()),
            other => OracleError::Numerical(other.to_string()),
        })
    }
}

/// Per-worker pricing session.
///
/// Owned exclusively by one worker and never shared across a process
/// boundary. The valuation date, calendar, and day count are fixed for the
/// session lifetime; only the market quotes mutate between calls.
///
/// # Examples
///
/// ```
/// use simgen_core::types::{Calendar, Date, DayCountConvention, OptionKind};
/// use simgen_harness::{ParameterSampler, PricingSession};
/// use simgen_models::analytic::HestonAnalyticEngine;
///
/// let valuation = Date::from_ymd(2025, 6, 16).unwrap();
/// let mut session = PricingSession::anchored(
///     HestonAnalyticEngine::new(),
///     valuation,
///     Calendar::UsSettlement,
///     DayCountConvention::Actual365Fixed,
/// );
///
/// let draw = ParameterSampler::from_seed(1).next_draw();
/// session.set_market(draw.rate, draw.dividend);
/// let price = session.price(&draw, OptionKind::Call);
/// assert!(price.is_finite());
/// ```
pub struct PricingSession<O> {
    oracle: O,
    quotes: MarketQuotes,
    valuation: Date,
    calendar: Calendar,
    day_count: DayCountConvention,
    advance: DateAdvance,
}

impl<O: Oracle> PricingSession<O> {
    /// Creates a session anchored on today's date.
    pub fn new(oracle: O, calendar: Calendar, day_count: DayCountConvention) -> Self {
        Self::anchored(oracle, Date::today(), calendar, day_count)
    }

    /// Creates a session anchored on an explicit valuation date.
    ///
    /// The date is rolled onto a business day (Following) once, here, and
    /// never mutated afterwards.
    pub fn anchored(
        oracle: O,
        valuation: Date,
        calendar: Calendar,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            oracle,
            quotes: MarketQuotes::new(SPOT, 0.03, 0.01),
            valuation: calendar.adjust(valuation),
            calendar,
            day_count,
            advance: DateAdvance::BusinessDays,
        }
    }

    /// Selects how expiry day offsets are applied to the valuation date.
    pub fn with_advance(mut self, advance: DateAdvance) -> Self {
        self.advance = advance;
        self
    }

    /// Returns the anchored valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation
    }

    /// Updates the rate and dividend quotes in place.
    pub fn set_market(&mut self, rate: f64, dividend: f64) {
        self.quotes.set_market(rate, dividend);
    }

    /// Resolves a year fraction into a concrete expiry date.
    ///
    /// `days = max(1, round(T * 365))`, then advanced from the valuation
    /// date by business days (or raw calendar days, per the configured
    /// [`DateAdvance`]).
    pub fn expiry_for(&self, expiry_years: f64) -> Date {
        let days = (expiry_years * DAYS_PER_YEAR).round().max(1.0) as u32;
        self.advance.apply(self.calendar, self.valuation, days)
    }

    /// Prices one row, converting any oracle failure to the NaN sentinel.
    pub fn price(&self, draw: &ParameterDraw, kind: OptionKind) -> f64 {
        match self.try_price(draw, kind) {
            Ok(price) => price,
            Err(err) => {
                debug!(
                    strike = draw.strike,
                    expiry_years = draw.expiry_years,
                    %err,
                    "pricing failed, recording sentinel"
                );
                f64::NAN
            }
        }
    }

    fn try_price(&self, draw: &ParameterDraw, kind: OptionKind) -> Result<f64, OracleError> {
        let heston = HestonParams::new(draw.v0, draw.theta, draw.kappa, draw.sigma, draw.rho)
            .map_err(|err| OracleError::InvalidParameters(err.to_string()))?;

        let request = PriceRequest {
            spot: self.quotes.spot(),
            strike: draw.strike,
            rate: self.quotes.rate(),
            dividend: self.quotes.dividend(),
            valuation: self.valuation,
            expiry: self.expiry_for(draw.expiry_years),
            day_count: self.day_count,
            heston,
            kind,
        };
        self.oracle.price(&request)
    }
}
