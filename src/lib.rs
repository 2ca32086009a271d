//! RollingIndex Library
//!
//! A Rust library for computing the daily settlement levels of
//! commodity/futures indices that roll exposure between contracts on a
//! monthly schedule.

pub mod analytics;
pub mod calendar;
pub mod common;
pub mod config;
pub mod data;
pub mod index;
pub mod roll;
pub mod services;

// Re-export commonly used types
pub use calendar::{business_days, day_ordinal, BusinessCalendar, BusinessDayCache, Period};
pub use common::errors::{IndexError, Result};
pub use common::types::{ContractNaming, ContractPair, MonthlySchedule, RollScheduleEntry};
pub use config::{load_config, AppConfig};
pub use index::{
    IndexConfiguration, IndexDefinition, IndexStructure, SettlementEngine,
    SingleAssetIndexConfiguration, WavIndexConfiguration, WavRecurrenceState,
};
pub use roll::{rolling_contracts, RollPhase, RollWindowSpec};
pub use services::{
    BoxedCalendarService, BoxedPriceService, CalendarService, PriceService, StaticCalendarService,
    StaticPriceService,
};

// Analytics and synthetic data
pub use analytics::SlopeOf;
pub use data::WhiteNoise;
