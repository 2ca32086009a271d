//! Trait definitions for external collaborators
//!
//! The core consumes prices and calendars as pure lookups returning
//! already-available values; no blocking I/O happens inside an
//! evaluation. Implementations back these traits with whatever feed or
//! store the host environment provides.

use chrono::NaiveDate;

use crate::calendar::BusinessCalendar;
use crate::common::errors::Result;

/// Source of contract prices
///
/// The symbol can represent both simple and complex things; the engine
/// only needs a price, independent of currency or scale. Absence of a
/// price is a `MissingPrice` condition: the day's level cannot be
/// computed and publication must be withheld.
pub trait PriceService: Send + Sync {
    /// The settlement price of a contract on a date
    fn price_in_dollars(&self, contract: &str, date: NaiveDate) -> Result<f64>;
}

/// Source of holiday calendars
pub trait CalendarService: Send + Sync {
    /// The calendar for a given symbol
    fn calendar_for(&self, symbol: &str) -> Result<&BusinessCalendar>;
}

/// Boxed price service for dynamic dispatch
pub type BoxedPriceService = Box<dyn PriceService>;

/// Boxed calendar service for dynamic dispatch
pub type BoxedCalendarService = Box<dyn CalendarService>;
