//! Unit-based index rebalancing
//!
//! The single-asset realization of the settlement level tracks literal
//! contract unit holdings through the roll. On the first day of a roll
//! window the engine snapshots the current units and derives the target
//! far-contract units by price weighting; during the window units move as
//! a linear blend of the *previous* near units and the *target* far units
//! (never current holdings, so re-evaluating an intermediate day cannot
//! compound); at the window end units snap exactly to the target. A
//! trading halt freezes units where they are — it never reverses a trade
//! that already executed, only withholds subsequent ones.

use std::collections::BTreeMap;

use tracing::debug;

use crate::common::errors::{IndexError, Result};
use crate::common::types::ContractPair;
use crate::index::wav::ContractPrices;
use crate::roll::RollPhase;

/// Contract unit holdings
pub type NotionalUnits = BTreeMap<String, f64>;

/// The published position: unit holdings, the price marked for each
/// holding at the time of the last trade (the cost basis), and the level
/// baseline established by that trade
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPosition {
    pub units: NotionalUnits,
    pub unit_values: ContractPrices,
    pub level: f64,
}

/// The cross-day state of the unit-based realization
///
/// `previous_units` and `target_units` are populated for the duration of a
/// roll cycle and cleared — exactly, with no tolerance — when the current
/// units reach the target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStructure {
    pub current_position: IndexPosition,
    pub previous_units: NotionalUnits,
    pub target_units: NotionalUnits,
}

impl IndexStructure {
    /// Seed the structure at index inception: the initial level buys units
    /// of the near contract at the first day's price
    pub fn initial(level: f64, contract: &str, price: f64) -> Self {
        let units: NotionalUnits = [(contract.to_string(), level / price)].into();
        Self {
            current_position: IndexPosition {
                units: units.clone(),
                unit_values: [(contract.to_string(), price)].into(),
                level,
            },
            previous_units: NotionalUnits::new(),
            target_units: NotionalUnits::new(),
        }
    }
}

/// One day's evaluation context for the rebalance engine
#[derive(Debug, Clone)]
pub struct RebalanceContext<'a> {
    pub date: chrono::NaiveDate,
    pub contracts: &'a ContractPair,
    pub prices: &'a ContractPrices,
    pub phase: RollPhase,
    pub roll_weight: f64,
    pub halted: bool,
}

fn price_for(prices: &ContractPrices, contract: &str, date: chrono::NaiveDate) -> Result<f64> {
    prices
        .get(contract)
        .copied()
        .ok_or_else(|| IndexError::MissingPrice {
            contract: contract.to_string(),
            date,
        })
}

/// Mark the position against today's prices: the trade-time baseline plus
/// the mark-to-market move of every holding since its basis was set
fn compute_level(position: &IndexPosition, prices: &ContractPrices, date: chrono::NaiveDate) -> Result<f64> {
    let mut level = position.level;
    for (contract, units) in &position.units {
        let basis = position.unit_values.get(contract).copied().unwrap_or(0.0);
        let price = price_for(prices, contract, date)?;
        level += (price - basis) * units;
    }
    Ok(level)
}

/// Derive target far-contract units from the near holding by price
/// weighting: the notional value carried over is preserved at today's
/// prices
fn target_units_from_current(
    near_units: f64,
    near_price: f64,
    far_price: f64,
) -> f64 {
    near_units * near_price / far_price
}

/// Advance the unit structure by one business day and return the new
/// structure with the level marked for publication
pub fn step(
    structure: &IndexStructure,
    ctx: &RebalanceContext<'_>,
) -> Result<(IndexStructure, f64)> {
    let needs_re_balance = !ctx.contracts.is_self_pair()
        || structure.current_position.units != structure.target_units;

    let mut new_structure = if needs_re_balance {
        re_balance_contracts(structure, ctx)?
    } else {
        structure.clone()
    };

    let level = compute_level(&new_structure.current_position, ctx.prices, ctx.date)?;
    if !level.is_finite() {
        return Err(IndexError::NonFiniteLevel {
            symbol: ctx.contracts.near.clone(),
            date: ctx.date,
        });
    }

    // Roll completion clears the cycle bookkeeping for the next window
    if new_structure.current_position.units == new_structure.target_units {
        new_structure.previous_units.clear();
        new_structure.target_units.clear();
    }

    Ok((new_structure, level))
}

fn re_balance_contracts(
    structure: &IndexStructure,
    ctx: &RebalanceContext<'_>,
) -> Result<IndexStructure> {
    let near = &ctx.contracts.near;
    let far = &ctx.contracts.far;

    let mut previous_units = structure.previous_units.clone();
    let mut target_units = structure.target_units.clone();

    // First day the window is open for a fresh cycle: snapshot what we
    // hold and where it is going, at today's prices
    if ctx.phase == RollPhase::During
        && target_units.is_empty()
        && !ctx.contracts.is_self_pair()
    {
        previous_units = structure.current_position.units.clone();
        let near_units = previous_units.get(near).copied().unwrap_or(0.0);
        let near_price = price_for(ctx.prices, near, ctx.date)?;
        let far_price = price_for(ctx.prices, far, ctx.date)?;
        target_units.insert(
            far.clone(),
            target_units_from_current(near_units, near_price, far_price),
        );
        debug!(near = %near, far = %far, date = %ctx.date, "roll window opened");
    }

    let mut current_units = match ctx.phase {
        RollPhase::Before => structure.current_position.units.clone(),
        RollPhase::During => {
            if ctx.halted {
                structure.current_position.units.clone()
            } else if target_units.is_empty() {
                // Nothing to roll into this cycle
                structure.current_position.units.clone()
            } else {
                let previous_near = previous_units.get(near).copied().unwrap_or(0.0);
                let target_far = target_units.get(far).copied().unwrap_or(0.0);
                let mut units = NotionalUnits::new();
                units.insert(near.clone(), previous_near * ctx.roll_weight);
                units.insert(far.clone(), target_far * (1.0 - ctx.roll_weight));
                units
            }
        }
        RollPhase::After => {
            if ctx.halted || target_units.is_empty() {
                structure.current_position.units.clone()
            } else {
                target_units.clone()
            }
        }
    };

    // A halt can carry an unfinished roll past the window end: the target
    // is still pending while the phase has wrapped back around. Once
    // trading resumes, convert in full; the discontinuity is accepted over
    // indefinite stale exposure.
    if ctx.phase == RollPhase::Before && !ctx.halted && !target_units.is_empty() {
        current_units = target_units.clone();
    }

    // Any change in holdings is a trade: re-baseline the level at today's
    // prices and mark the new cost basis
    let current_position = if current_units != structure.current_position.units {
        let mut level = 0.0;
        let mut unit_values = ContractPrices::new();
        for (contract, units) in &current_units {
            let price = price_for(ctx.prices, contract, ctx.date)?;
            level += units * price;
            unit_values.insert(contract.clone(), price);
        }
        debug!(date = %ctx.date, level, "position traded");
        IndexPosition {
            units: current_units,
            unit_values,
            level,
        }
    } else {
        structure.current_position.clone()
    };

    Ok(IndexStructure {
        current_position,
        previous_units,
        target_units,
    })
}
