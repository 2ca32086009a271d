//! Weighted average values
//!
//! A WAV is the composition-weighted sum of contract prices representing
//! one side (near or far) of a blended index value. Summation iterates
//! `BTreeMap`s so the order, and therefore the floating-point result, is
//! reproducible across runs.

use std::collections::BTreeMap;

use crate::common::errors::{IndexError, Result};
use crate::common::types::ContractPair;

/// Prices keyed by contract identifier
pub type ContractPrices = BTreeMap<String, f64>;

/// Weights keyed by contract identifier
pub type ContractWeights = BTreeMap<String, f64>;

/// Compute the weighted average value of a contract set
///
/// `weights` maps asset to composition weight, `contracts` maps asset to
/// the contract carrying that asset's exposure today. Fails with
/// `MissingPrice` when any referenced contract has no price.
pub fn weighted_average(
    weights: &BTreeMap<String, f64>,
    contracts: &BTreeMap<String, String>,
    prices: &ContractPrices,
    date: chrono::NaiveDate,
) -> Result<f64> {
    let mut total = 0.0;
    for (asset, weight) in weights {
        let contract = contracts.get(asset).ok_or_else(|| {
            IndexError::Configuration(format!("no rolling contract resolved for asset {asset}"))
        })?;
        let price = prices
            .get(contract)
            .copied()
            .ok_or_else(|| IndexError::MissingPrice {
                contract: contract.clone(),
                date,
            })?;
        total += weight * price;
    }
    Ok(total)
}

/// Flatten a contract pair with its (near, far) weights into a
/// contract-keyed weight map.
///
/// A self-pair collapses to a single entry carrying the summed weight. A
/// side is dropped exactly when the *other* side's weight is zero — a pair
/// weighted (w, 0) is entirely near, (0, w) entirely far — and a mixed
/// weighting keeps both entries.
pub fn contract_weights(pair: &ContractPair, near_weight: f64, far_weight: f64) -> ContractWeights {
    let mut out = BTreeMap::new();
    if pair.near == pair.far {
        out.insert(pair.near.clone(), near_weight + far_weight);
    } else if far_weight == 0.0 {
        out.insert(pair.near.clone(), near_weight);
    } else if near_weight == 0.0 {
        out.insert(pair.far.clone(), far_weight);
    } else {
        out.insert(pair.near.clone(), near_weight);
        out.insert(pair.far.clone(), far_weight);
    }
    out
}

/// Merge per-asset contract weights into one contract-keyed map, summing
/// weights where assets roll through the same contract
pub fn merge_contract_weights<I>(maps: I) -> ContractWeights
where
    I: IntoIterator<Item = ContractWeights>,
{
    let mut out = BTreeMap::new();
    for map in maps {
        for (contract, weight) in map {
            *out.entry(contract).or_insert(0.0) += weight;
        }
    }
    out
}
