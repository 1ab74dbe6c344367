//! # simgen_models: Heston Model Layer
//!
//! Model-level building blocks for the simulation harness:
//! - `heston`: Heston parameter set with eager validation and Feller
//!   diagnostics
//! - `config`: pricing-engine configuration (grid sizes, damping steps,
//!   finite-difference scheme selection)
//! - `analytic`: semi-analytic Heston vanilla engine used as the shipped
//!   pricing oracle
//!
//! ## Layer Role
//!
//! This crate sits between `simgen_core` (dates, calendars, option
//! vocabulary) and `simgen_harness` (sampling, workers, persistence). It
//! knows nothing about workers, random draws, or output files; it only
//! prices one contract at a time from fully specified inputs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod analytic;
pub mod config;
pub mod heston;

pub use analytic::{EngineError, HestonAnalyticEngine};
pub use config::{EngineConfig, EngineConfigError, Scheme};
pub use heston::{HestonError, HestonParams};
