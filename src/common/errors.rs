//! Error types for the crate

use thiserror::Error;

/// Result type alias using our IndexError
pub type Result<T> = std::result::Result<T, IndexError>;

/// Main error type for index computation
#[derive(Error, Debug)]
pub enum IndexError {
    /// An unsupported calendar period was requested
    #[error("Unknown calendar period: {0}")]
    UnknownPeriod(String),

    /// A required contract has no price at evaluation time.
    /// The day's level cannot be computed and publication is withheld.
    #[error("Missing price for contract {contract} on {date}")]
    MissingPrice {
        contract: String,
        date: chrono::NaiveDate,
    },

    /// No calendar or configuration is registered for the symbol
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// A configured roll window overlaps the prior roll cycle
    #[error("Roll window [{start},{end}] overlaps the prior roll cycle")]
    RollWindowOverlap { start: i32, end: i32 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A computed level is NaN or infinite and must not be published
    #[error("Non-finite level computed for {symbol} on {date}")]
    NonFiniteLevel {
        symbol: String,
        date: chrono::NaiveDate,
    },
}
