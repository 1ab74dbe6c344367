//! Mutable market quote state.
//!
//! The pricing session keeps one [`MarketQuotes`] alive for the lifetime of a
//! worker process and updates it in place between pricing calls. This is the
//! cheap tier of the adapter's state split: quote updates are plain field
//! stores, while model and contract objects are rebuilt per call.

/// Flat market quotes: spot, risk-free rate, and dividend yield.
///
/// Rates are continuously compounded and apply to all maturities.
///
/// # Examples
///
/// ```
/// use simgen_core::market::MarketQuotes;
///
/// let mut quotes = MarketQuotes::new(205.0, 0.03, 0.01);
/// quotes.set_market(0.045, 0.02);
/// assert_eq!(quotes.rate(), 0.045);
/// assert_eq!(quotes.spot(), 205.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketQuotes {
    spot: f64,
    rate: f64,
    dividend: f64,
}

impl MarketQuotes {
    /// Creates a quote set with initial spot, rate, and dividend values.
    #[inline]
    pub fn new(spot: f64, rate: f64, dividend: f64) -> Self {
        Self {
            spot,
            rate,
            dividend,
        }
    }

    /// Updates the rate and dividend quotes in place.
    ///
    /// The spot quote is left untouched; the sampler holds it constant for
    /// the whole run.
    #[inline]
    pub fn set_market(&mut self, rate: f64, dividend: f64) {
        self.rate = rate;
        self.dividend = dividend;
    }

    /// Returns the spot quote.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate quote.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the dividend yield quote.
    #[inline]
    pub fn dividend(&self) -> f64 {
        self.dividend
    }
}
