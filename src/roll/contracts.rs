//! Rolling contract resolution
//!
//! Maps a date onto the (near, far) contract pair for the current roll
//! cycle. The near contract comes from the schedule entry for the date's
//! calendar month, the far contract from the entry for the following month,
//! so the pair is stable for every day of a calendar month. A non-rolling
//! month maps both entries to the same target and yields a self-pair.

use chrono::{Datelike, NaiveDate};

use crate::common::errors::Result;
use crate::common::types::{ContractNaming, ContractPair, MonthlySchedule};

/// The contract pair active for the roll cycle containing `date`
pub fn rolling_contracts(
    symbol: &str,
    date: NaiveDate,
    schedule: &MonthlySchedule,
    naming: ContractNaming,
) -> Result<ContractPair> {
    let month = date.month();
    let year = date.year();

    let near_entry = schedule.entry(month)?;
    let near = naming.format(symbol, near_entry.month, year + near_entry.year_offset)?;

    let next_month = month % 12 + 1;
    let next_year = if next_month == 1 { year + 1 } else { year };
    let far_entry = schedule.entry(next_month)?;
    let far = naming.format(symbol, far_entry.month, next_year + far_entry.year_offset)?;

    Ok(ContractPair { near, far })
}
