//! Common types and errors shared across the crate

pub mod errors;
pub mod types;

pub use errors::{IndexError, Result};
pub use types::{
    month_code, month_from_code, round_half_even, ContractNaming, ContractPair, MonthlySchedule,
    RollSchedule, RollScheduleEntry, MONTH_CODES,
};
