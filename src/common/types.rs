//! Shared domain types for rolling futures indices

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::{IndexError, Result};

/// Futures month-letter codes, January through December
pub const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// The month-letter code for a calendar month (1-12)
pub fn month_code(month: u32) -> Result<char> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_CODES.get(i as usize))
        .copied()
        .ok_or_else(|| IndexError::Configuration(format!("invalid contract month {month}")))
}

/// The calendar month (1-12) for a futures month-letter code
pub fn month_from_code(code: char) -> Result<u32> {
    MONTH_CODES
        .iter()
        .position(|&c| c == code)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| IndexError::Configuration(format!("invalid contract month code '{code}'")))
}

/// Contract naming strategy
///
/// A configuration-time choice among a closed set of symbol formats.
/// `BloombergComdty` is the default and produces identifiers such as
/// `"GCG25 Comdty"`; `Plain` drops the suffix (`"GCG25"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractNaming {
    #[default]
    BloombergComdty,
    Plain,
}

impl ContractNaming {
    /// Format a contract identifier for a symbol, month (1-12) and year
    pub fn format(&self, symbol: &str, month: u32, year: i32) -> Result<String> {
        let code = month_code(month)?;
        let yy = year.rem_euclid(100);
        Ok(match self {
            ContractNaming::BloombergComdty => format!("{symbol}{code}{yy:02} Comdty"),
            ContractNaming::Plain => format!("{symbol}{code}{yy:02}"),
        })
    }
}

/// The pair of contracts active for the current roll cycle
///
/// `near` is the contract currently held, `far` the one being rolled into.
/// In a non-rolling month `near == far`; downstream logic treats the
/// self-pair as a no-op roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractPair {
    pub near: String,
    pub far: String,
}

impl ContractPair {
    pub fn new(near: impl Into<String>, far: impl Into<String>) -> Self {
        Self {
            near: near.into(),
            far: far.into(),
        }
    }

    /// True when no roll occurs this month
    pub fn is_self_pair(&self) -> bool {
        self.near == self.far
    }
}

/// One entry of a monthly roll schedule: the target contract month and
/// its year offset (0 = same year, 1 = next year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollScheduleEntry {
    pub month: u32,
    pub year_offset: i32,
}

impl RollScheduleEntry {
    /// Parse the `"H0"` / `"F1"` short form: a month-letter code followed
    /// by a single-digit year offset.
    pub fn parse(code: &str) -> Result<Self> {
        let mut chars = code.chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(IndexError::Configuration(format!(
                "invalid roll schedule entry '{code}'"
            )));
        };
        let month = month_from_code(letter)?;
        let year_offset = digit
            .to_digit(10)
            .filter(|&d| d <= 1)
            .ok_or_else(|| {
                IndexError::Configuration(format!("invalid roll schedule year offset in '{code}'"))
            })? as i32;
        Ok(Self { month, year_offset })
    }
}

/// Per-month roll schedule for one asset
///
/// Maps a calendar month (1-12) to the contract that becomes the fully-held
/// position once that month's roll completes. A complete schedule has all
/// twelve entries; partial schedules are permitted for reference data that
/// only covers the months an index actually prices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySchedule {
    entries: BTreeMap<u32, RollScheduleEntry>,
}

impl MonthlySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a full schedule from twelve `"H0"`-style codes, January first
    pub fn from_codes(codes: &[&str]) -> Result<Self> {
        if codes.len() != 12 {
            return Err(IndexError::Configuration(format!(
                "roll schedule must have 12 entries, got {}",
                codes.len()
            )));
        }
        let mut schedule = Self::new();
        for (i, code) in codes.iter().enumerate() {
            schedule.set(i as u32 + 1, RollScheduleEntry::parse(code)?);
        }
        Ok(schedule)
    }

    pub fn set(&mut self, month: u32, entry: RollScheduleEntry) {
        self.entries.insert(month, entry);
    }

    /// The schedule entry for a calendar month (1-12)
    pub fn entry(&self, month: u32) -> Result<RollScheduleEntry> {
        self.entries.get(&month).copied().ok_or_else(|| {
            IndexError::Configuration(format!("no roll schedule entry for month {month}"))
        })
    }
}

/// Per-asset roll schedules, keyed by asset symbol
pub type RollSchedule = BTreeMap<String, MonthlySchedule>;

/// Round a value to `dp` decimal places using banker's rounding
/// (round-half-to-even). Non-finite inputs pass through unchanged so the
/// caller's finiteness check can reject them.
pub fn round_half_even(value: f64, dp: u32) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}
