//! Common test utilities and fixtures

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rolling_index::{
    BusinessCalendar, ContractNaming, IndexConfiguration, IndexDefinition,
    SingleAssetIndexConfiguration, StaticCalendarService, StaticPriceService,
    WavIndexConfiguration,
};
use std::collections::BTreeMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Monday-to-Friday calendar with no holidays
#[allow(dead_code)]
pub fn weekday_calendar() -> BusinessCalendar {
    BusinessCalendar::weekdays(Default::default())
}

/// Calendar service with a weekday "Test" calendar plus a BCOM-style
/// calendar observing New Year's Day 2025
#[allow(dead_code)]
pub fn calendar_service() -> StaticCalendarService {
    let mut calendars = StaticCalendarService::new();
    calendars.insert_weekdays("Test", []);
    calendars.insert_weekdays("BCOM", [date(2025, 1, 1)]);
    calendars
}

/// The crude-oil style roll schedule used by the single-asset scenarios
#[allow(dead_code)]
static CL_ROLL_SCHEDULE: Lazy<Vec<String>> = Lazy::new(|| {
    ["H0", "H0", "K0", "K0", "N0", "N0", "U0", "U0", "X0", "X0", "F0", "F1"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

#[allow(dead_code)]
pub fn cl_roll_schedule() -> Vec<String> {
    CL_ROLL_SCHEDULE.clone()
}

/// A single-asset crude index rolling over publishing days 5 through 10
#[allow(dead_code)]
pub fn cl_index(start_date: NaiveDate, halt_calendar: Option<&str>) -> IndexDefinition {
    IndexDefinition::SingleAsset(SingleAssetIndexConfiguration {
        index: IndexConfiguration {
            symbol: "CL Index".to_string(),
            publish_holiday_calendar: "Test".to_string(),
            rounding: 8,
            initial_level: 100.0,
            start_date,
        },
        asset: "CL".to_string(),
        roll_period: (5, 10),
        roll_schedule: cl_roll_schedule(),
        roll_rounding: 8,
        trading_halt_calendar: halt_calendar.map(|s| s.to_string()),
        contract_naming: ContractNaming::BloombergComdty,
    })
}

/// A two-asset WAV-ratio index over the same five-day window
#[allow(dead_code)]
pub fn wav_index(start_date: NaiveDate) -> IndexDefinition {
    let mut weights = BTreeMap::new();
    weights.insert("GC".to_string(), 0.25);
    weights.insert("CL".to_string(), 0.75);
    let mut roll_schedules = BTreeMap::new();
    roll_schedules.insert("CL".to_string(), cl_roll_schedule());
    roll_schedules.insert(
        "GC".to_string(),
        ["G0", "J0", "J0", "M0", "M0", "Q0", "Q0", "Z0", "Z0", "Z0", "Z0", "G1"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    IndexDefinition::WavRatio(WavIndexConfiguration {
        index: IndexConfiguration {
            symbol: "Two Asset Index".to_string(),
            publish_holiday_calendar: "Test".to_string(),
            rounding: 8,
            initial_level: 100.0,
            start_date,
        },
        weights,
        roll_schedules,
        roll_period: (5, 10),
        roll_rounding: 8,
        contract_naming: ContractNaming::BloombergComdty,
    })
}

/// Flat prices for every contract a scenario can touch, over a date span
#[allow(dead_code)]
pub fn flat_prices(
    contracts: &[(&str, f64)],
    from: NaiveDate,
    days: usize,
) -> StaticPriceService {
    let mut prices = StaticPriceService::new();
    for (contract, price) in contracts {
        prices.insert_series(
            *contract,
            from.iter_days().take(days).map(|d| (d, *price)),
        );
    }
    prices
}
