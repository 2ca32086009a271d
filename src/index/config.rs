//! Index configuration
//!
//! Typed definitions of the indices this crate can price. The level is
//! path dependent, so every configuration carries a start date and an
//! initial level alongside the publishing calendar and rounding precision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::errors::{IndexError, Result};
use crate::common::types::{ContractNaming, MonthlySchedule};

fn default_rounding() -> u32 {
    8
}

fn default_initial_level() -> f64 {
    100.0
}

/// Configuration shared by every index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfiguration {
    /// The index symbol
    pub symbol: String,
    /// The calendar used for publishing the index
    pub publish_holiday_calendar: String,
    /// Decimal places to round the published level to
    #[serde(default = "default_rounding")]
    pub rounding: u32,
    /// The level to start the index at
    #[serde(default = "default_initial_level")]
    pub initial_level: f64,
    /// The first date of the index; required because the level is defined
    /// recursively from the previous day's level
    pub start_date: NaiveDate,
}

/// A single-asset index that rolls monthly, tracking literal contract
/// units through the roll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleAssetIndexConfiguration {
    #[serde(flatten)]
    pub index: IndexConfiguration,
    /// The asset symbol used to construct contract names
    pub asset: String,
    /// First and last publishing day of the roll. The first day may be
    /// negative, starting that many publishing days before the month
    /// rolling into; the last day must be positive. Days are publishing
    /// days of the month, not calendar days.
    pub roll_period: (i32, i32),
    /// Twelve month-code/year-offset entries (`"H0"`, ..., `"F1"`), one
    /// per calendar month, naming the contract that becomes the fully
    /// held position once that month's roll completes
    pub roll_schedule: Vec<String>,
    /// Decimal places to round roll weights to
    #[serde(default = "default_rounding")]
    pub roll_rounding: u32,
    /// Calendar whose holidays mark trading-halt days, if any
    #[serde(default)]
    pub trading_halt_calendar: Option<String>,
    /// Contract naming strategy
    #[serde(default)]
    pub contract_naming: ContractNaming,
}

impl SingleAssetIndexConfiguration {
    /// Fail-fast validation: runs before any day is evaluated
    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.roll_period;
        if end <= 0 || start >= end {
            return Err(IndexError::RollWindowOverlap { start, end });
        }
        // A window longer than the shortest trading month necessarily
        // overlaps the prior cycle; the month actually priced is checked
        // again with its real length.
        if start < 0 && end - start > 18 {
            return Err(IndexError::RollWindowOverlap { start, end });
        }
        self.schedule()?;
        Ok(())
    }

    /// The parsed monthly roll schedule
    pub fn schedule(&self) -> Result<MonthlySchedule> {
        let codes: Vec<&str> = self.roll_schedule.iter().map(String::as_str).collect();
        MonthlySchedule::from_codes(&codes)
    }
}

/// A multi-asset index priced as a ratio of weighted average values,
/// BCOM-style
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WavIndexConfiguration {
    #[serde(flatten)]
    pub index: IndexConfiguration,
    /// Composition weights by asset symbol
    pub weights: BTreeMap<String, f64>,
    /// Roll schedules by asset symbol, each a twelve-entry code list
    pub roll_schedules: BTreeMap<String, Vec<String>>,
    /// First and last publishing day of the roll, shared by all assets.
    /// The WAV recurrence re-bases at the calendar month boundary, so the
    /// window must sit inside its month: the start cannot be negative.
    pub roll_period: (i32, i32),
    /// Decimal places to round roll weights to
    #[serde(default = "default_rounding")]
    pub roll_rounding: u32,
    /// Contract naming strategy
    #[serde(default)]
    pub contract_naming: ContractNaming,
}

impl WavIndexConfiguration {
    /// Fail-fast validation: runs before any day is evaluated
    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.roll_period;
        if start < 0 {
            return Err(IndexError::Configuration(
                "WAV-ratio indices require a non-negative roll window start".to_string(),
            ));
        }
        if end <= 0 || start >= end {
            return Err(IndexError::RollWindowOverlap { start, end });
        }
        if self.weights.is_empty() {
            return Err(IndexError::Configuration(
                "index composition has no assets".to_string(),
            ));
        }
        for asset in self.weights.keys() {
            let codes = self.roll_schedules.get(asset).ok_or_else(|| {
                IndexError::Configuration(format!("no roll schedule for asset {asset}"))
            })?;
            let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
            MonthlySchedule::from_codes(&codes)?;
        }
        Ok(())
    }

    /// The parsed schedule for one asset
    pub fn schedule_for(&self, asset: &str) -> Result<MonthlySchedule> {
        let codes = self.roll_schedules.get(asset).ok_or_else(|| {
            IndexError::Configuration(format!("no roll schedule for asset {asset}"))
        })?;
        let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
        MonthlySchedule::from_codes(&codes)
    }
}

/// An index definition, dispatching to one of the two settlement
/// realizations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexDefinition {
    SingleAsset(SingleAssetIndexConfiguration),
    WavRatio(WavIndexConfiguration),
}

impl IndexDefinition {
    pub fn symbol(&self) -> &str {
        match self {
            IndexDefinition::SingleAsset(config) => &config.index.symbol,
            IndexDefinition::WavRatio(config) => &config.index.symbol,
        }
    }

    pub fn index(&self) -> &IndexConfiguration {
        match self {
            IndexDefinition::SingleAsset(config) => &config.index,
            IndexDefinition::WavRatio(config) => &config.index,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            IndexDefinition::SingleAsset(config) => config.validate(),
            IndexDefinition::WavRatio(config) => config.validate(),
        }
    }
}
