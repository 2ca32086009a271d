//! Configuration types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::index::IndexDefinition;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Index definitions keyed by symbol
    #[serde(default)]
    pub indices: Vec<IndexDefinition>,
    /// Holiday calendars keyed by symbol
    #[serde(default)]
    pub calendars: BTreeMap<String, CalendarConfig>,
    /// Path to a JSON price table (contract -> date -> price)
    #[serde(default)]
    pub prices_file: Option<String>,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// One holiday calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Holiday dates excluded from publishing
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// First working day of the week, 0 = Monday
    #[serde(default)]
    pub start_of_week: u8,
    /// Last working day of the week, 4 = Friday
    #[serde(default = "default_end_of_week")]
    pub end_of_week: u8,
}

fn default_end_of_week() -> u8 {
    4
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            holidays: Vec::new(),
            start_of_week: 0,
            end_of_week: default_end_of_week(),
        }
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
