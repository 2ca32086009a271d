//! In-memory service implementations
//!
//! Fixed-table implementations of the service traits, for tests,
//! backtests and the CLI. Prices can be loaded from a JSON document
//! mapping contract identifiers to date-keyed prices.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::calendar::BusinessCalendar;
use crate::common::errors::{IndexError, Result};

use super::traits::{CalendarService, PriceService};

/// Price service backed by a fixed table of dated prices
#[derive(Debug, Clone, Default)]
pub struct StaticPriceService {
    prices: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
}

impl StaticPriceService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price for a contract on a date
    pub fn insert(&mut self, contract: impl Into<String>, date: NaiveDate, price: f64) {
        self.prices.entry(contract.into()).or_default().insert(date, price);
    }

    /// Record a daily price series for a contract
    pub fn insert_series<I>(&mut self, contract: impl Into<String>, series: I)
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        self.prices.entry(contract.into()).or_default().extend(series);
    }

    /// Load from a JSON document of the form
    /// `{"CLK25 Comdty": {"2025-04-01": 62.5, ...}, ...}`
    pub fn from_json(json: &str) -> Result<Self> {
        let prices: BTreeMap<String, BTreeMap<NaiveDate, f64>> = serde_json::from_str(json)
            .map_err(|e| IndexError::Configuration(format!("invalid price table: {e}")))?;
        Ok(Self { prices })
    }
}

impl PriceService for StaticPriceService {
    fn price_in_dollars(&self, contract: &str, date: NaiveDate) -> Result<f64> {
        self.prices
            .get(contract)
            .and_then(|series| series.get(&date))
            .copied()
            .ok_or_else(|| IndexError::MissingPrice {
                contract: contract.to_string(),
                date,
            })
    }
}

/// Calendar service backed by a fixed symbol map
#[derive(Debug, Clone, Default)]
pub struct StaticCalendarService {
    calendars: BTreeMap<String, BusinessCalendar>,
}

impl StaticCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a calendar under a symbol
    pub fn insert(&mut self, symbol: impl Into<String>, calendar: BusinessCalendar) {
        self.calendars.insert(symbol.into(), calendar);
    }

    /// Register a Monday-to-Friday calendar with the given holidays
    pub fn insert_weekdays<I>(&mut self, symbol: impl Into<String>, holidays: I)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.insert(
            symbol,
            BusinessCalendar::weekdays(holidays.into_iter().collect()),
        );
    }
}

impl CalendarService for StaticCalendarService {
    fn calendar_for(&self, symbol: &str) -> Result<&BusinessCalendar> {
        self.calendars
            .get(symbol)
            .ok_or_else(|| IndexError::UnknownSymbol(symbol.to_string()))
    }
}
