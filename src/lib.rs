//! # Cure Freedom Telegram Bot
//!
//! A Telegram bot that cures freedom units: it parses a unit expression
//! from a command argument (e.g. "5 ft", "2 cups", "10 usd"), resolves it
//! against a fixed unit catalog and replies with the converted value.

pub mod aldi;
pub mod bot;
pub mod conversion;
pub mod currency;
pub mod errors;
pub mod units;

// Re-export types for easier access
pub use errors::{ConvertError, ConvertResult};
pub use units::{Conversion, RenderMode, UnitDefinition, UnitMatch, UnitRegistry};
