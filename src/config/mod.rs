//! Application configuration loading

pub mod loader;
pub mod types;

pub use loader::{build_services, load_config};
pub use types::{AppConfig, AppSettings, CalendarConfig};
