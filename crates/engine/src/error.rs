//! The module contains the errors the engine can return.
//!
//! - [`InvalidAmount`] when a user supplied amount cannot be used.
//! - [`InvalidFilter`] when filter state fails validation.
//! - [`UnknownTimezone`] when a timezone name is not in the IANA database.
//! - [`Overflow`] when summing amounts leaves the range of minor units.
//! - [`Csv`] and [`Io`] while exporting a report.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`UnknownTimezone`]: EngineError::UnknownTimezone
//!  [`Overflow`]: EngineError::Overflow
//!  [`Csv`]: EngineError::Csv
//!  [`Io`]: EngineError::Io
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Amount overflow: {0}")]
    Overflow(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::UnknownTimezone(a), Self::UnknownTimezone(b)) => a == b,
            (Self::Overflow(a), Self::Overflow(b)) => a == b,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
