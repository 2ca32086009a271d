//! Configuration loader

use ::config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{IndexError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| IndexError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| IndexError::Configuration(e.to_string()))
}

/// Build the static services an `AppConfig` describes
pub fn build_services(
    config: &AppConfig,
) -> Result<(
    crate::services::StaticPriceService,
    crate::services::StaticCalendarService,
)> {
    let prices = match &config.prices_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| IndexError::Configuration(format!("cannot read {path}: {e}")))?;
            crate::services::StaticPriceService::from_json(&json)?
        }
        None => crate::services::StaticPriceService::new(),
    };

    let mut calendars = crate::services::StaticCalendarService::new();
    for (symbol, calendar) in &config.calendars {
        calendars.insert(
            symbol.clone(),
            crate::calendar::BusinessCalendar::new(
                calendar.holidays.iter().copied().collect(),
                calendar.start_of_week,
                calendar.end_of_week,
            ),
        );
    }
    Ok((prices, calendars))
}
