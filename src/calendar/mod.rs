//! Business-calendar day enumeration

pub mod business;

pub use business::{
    business_days, day_ordinal, days_in_month, BusinessCalendar, BusinessDayCache, Period,
};
