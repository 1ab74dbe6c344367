//! Error types for foundation-layer operations.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `OptionKindError`: Errors from option-type string parsing

use thiserror::Error;

/// Date-related errors.
///
/// # Examples
/// ```
/// use simgen_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2025, month: 2, day: 30 };
/// assert_eq!(err.to_string(), "invalid date: 2025-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g. February 30th).
    #[error("invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
        /// Day component.
        day: u32,
    },

    /// Failed to parse a date string.
    #[error("failed to parse date: {0}")]
    ParseError(String),
}

/// Option-type parsing errors.
///
/// Raised eagerly at configuration time so an invalid option-type string is
/// rejected before any worker process is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionKindError {
    /// The string matched neither `call`/`c` nor `put`/`p`.
    #[error("unrecognised option type '{0}' (expected 'call'/'c' or 'put'/'p')")]
    Unrecognised(String),
}
