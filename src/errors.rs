//! # Conversion Error Types
//!
//! This module defines the error taxonomy for the conversion pipeline.
//! Matching and number-extraction failures resolve to user-visible reply
//! strings; the exchange-rate failure propagates to the handler boundary.

use std::fmt;

/// Failure conditions of a single conversion request
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// No registered unit pattern matched the input
    NoMatch,
    /// A unit suffix matched but no numeric field was attached to it
    MissingNumber,
    /// The numeric field could not be parsed as a float
    NotANumber(String),
    /// The exchange-rate lookup failed
    RateLookup(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::NoMatch => write!(f, "couldn't find a valid unit to convert"),
            ConvertError::MissingNumber => write!(f, "couldn't find a valid number"),
            ConvertError::NotANumber(value) => {
                write!(f, "couldn't parse number (`{}`) as float", value)
            }
            ConvertError::RateLookup(msg) => write!(f, "[CURRENCY] {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {}

impl ConvertError {
    /// Whether this failure resolves to a reply string instead of failing
    /// the command at the handler boundary.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            ConvertError::NoMatch | ConvertError::MissingNumber | ConvertError::NotANumber(_)
        )
    }
}

/// Result type alias for convenience
pub type ConvertResult<T> = Result<T, ConvertError>;
