//! # simgen_core: Foundation Types for the Simulation Harness
//!
//! ## Layer Role
//!
//! simgen_core is the bottom layer of the workspace, providing:
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Calendar arithmetic: `Calendar`, `DateAdvance` (`types::calendar`)
//! - Contract vocabulary: `OptionKind` (`types::option`)
//! - Mutable market quote state: `MarketQuotes` (`market`)
//! - Error types: `DateError`, `OptionKindError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! This layer depends on no other simgen crate, with minimal external
//! dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Structured error types
//! - serde: Serialisation of assignment payloads across process boundaries
//!
//! ## Usage Examples
//!
//! ```rust
//! use simgen_core::types::{Calendar, Date, DayCountConvention};
//!
//! let valuation = Date::from_ymd(2025, 6, 16).unwrap();
//! let expiry = Calendar::UsSettlement.advance_business_days(valuation, 21);
//! let tau = DayCountConvention::Actual365Fixed.year_fraction(valuation, expiry);
//! assert!(tau > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod market;
pub mod types;
