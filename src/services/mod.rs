//! External collaborator interfaces and in-memory implementations

pub mod static_impl;
pub mod traits;

pub use static_impl::{StaticCalendarService, StaticPriceService};
pub use traits::{BoxedCalendarService, BoxedPriceService, CalendarService, PriceService};
