//! Semi-analytic Heston pricing.
//!
//! This module provides the shipped implementation of the pricing oracle:
//! - `heston`: Gatheral log-formulation characteristic function integrated
//!   with 96-node Gauss-Laguerre quadrature
//! - `error`: engine error types
//!
//! The engine prices one European vanilla contract per call from fully
//! specified inputs; puts are obtained from the call value through put-call
//! parity.

pub mod error;
pub mod heston;

pub use error::EngineError;
pub use heston::{HestonAnalyticEngine, VanillaTerms};
