//! Index pricing engines
//!
//! Two realizations of the daily settlement level share the roll
//! machinery:
//!
//! - [`recurrence`]: a ratio of weighted average values, for multi-asset
//!   indices of the BCOM style. The only cross-day state is the previous
//!   level and the previous two WAVs.
//! - [`rebalance`]: literal contract unit holdings rebalanced through the
//!   roll window, for single-asset indices. The cross-day state is the
//!   current position plus the cycle's previous and target units.
//!
//! [`pricing::SettlementEngine`] drives either realization one business
//! day at a time, threading the state record explicitly.

pub mod config;
pub mod pricing;
pub mod rebalance;
pub mod recurrence;
pub mod wav;

pub use config::{
    IndexConfiguration, IndexDefinition, SingleAssetIndexConfiguration, WavIndexConfiguration,
};
pub use pricing::SettlementEngine;
pub use rebalance::{IndexPosition, IndexStructure, NotionalUnits, RebalanceContext};
pub use recurrence::WavRecurrenceState;
pub use wav::{
    contract_weights, merge_contract_weights, weighted_average, ContractPrices, ContractWeights,
};
