//! Roll window and rolling contract resolution

pub mod contracts;
pub mod window;

pub use contracts::rolling_contracts;
pub use window::{RollPhase, RollWindowSpec};
