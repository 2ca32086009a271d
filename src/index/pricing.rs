//! Settlement level computation
//!
//! The one operation the crate exposes to callers: given an index
//! definition and a date, compute the published settlement level. The
//! level is recursively defined from the previous day's state, so the
//! engine advances an owned state record one business day at a time from
//! the index start date — days are strictly ordered, the state is fed
//! back explicitly, and each day is evaluated exactly once per run.
//! Independent indices share nothing mutable and may be priced
//! concurrently.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::calendar::{business_days, day_ordinal, BusinessDayCache, Period};
use crate::common::errors::{IndexError, Result};
use crate::common::types::round_half_even;
use crate::index::config::{
    IndexDefinition, SingleAssetIndexConfiguration, WavIndexConfiguration,
};
use crate::index::rebalance::{self, IndexStructure, RebalanceContext};
use crate::index::recurrence::{self, WavRecurrenceState};
use crate::index::wav::{contract_weights, merge_contract_weights, weighted_average, ContractPrices};
use crate::roll::{rolling_contracts, RollWindowSpec};
use crate::services::{CalendarService, PriceService};

/// Prices and calendars bundled for an evaluation run
pub struct SettlementEngine<'a> {
    prices: &'a dyn PriceService,
    calendars: &'a dyn CalendarService,
}

/// The last calendar day of the month preceding the one containing `date`
fn prior_month_day(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .expect("day 1 is always valid")
        .pred_opt()
        .expect("prior month within date range")
}

impl<'a> SettlementEngine<'a> {
    pub fn new(prices: &'a dyn PriceService, calendars: &'a dyn CalendarService) -> Self {
        Self { prices, calendars }
    }

    /// The published settlement level of an index as of a date
    pub fn settlement_level(&self, definition: &IndexDefinition, as_of: NaiveDate) -> Result<f64> {
        self.settlement_series(definition, as_of)?
            .last()
            .map(|(_, level)| *level)
            .ok_or_else(|| {
                IndexError::Configuration(format!(
                    "no business day between index start and {as_of}"
                ))
            })
    }

    /// The full dated level series from the index start date through
    /// `as_of`. Configuration errors fail before any day is evaluated; a
    /// missing price aborts the run on the day it occurs, withholding that
    /// day's publication and everything after it.
    pub fn settlement_series(
        &self,
        definition: &IndexDefinition,
        as_of: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        definition.validate()?;
        if as_of < definition.index().start_date {
            return Err(IndexError::Configuration(format!(
                "as-of date {as_of} precedes index start {}",
                definition.index().start_date
            )));
        }
        match definition {
            IndexDefinition::SingleAsset(config) => self.single_asset_series(config, as_of),
            IndexDefinition::WavRatio(config) => self.wav_ratio_series(config, as_of),
        }
    }

    fn single_asset_series(
        &self,
        config: &SingleAssetIndexConfiguration,
        as_of: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let calendar = self
            .calendars
            .calendar_for(&config.index.publish_holiday_calendar)?;
        let halt_calendar = config
            .trading_halt_calendar
            .as_deref()
            .map(|symbol| self.calendars.calendar_for(symbol))
            .transpose()?;
        let schedule = config.schedule()?;
        let (roll_start, roll_end) = config.roll_period;

        let mut cache = BusinessDayCache::new();
        let mut structure: Option<IndexStructure> = None;
        let mut series = Vec::new();

        let mut date = config.index.start_date;
        while date <= as_of {
            let ordinal = {
                let days = cache.days_for(Period::Month, calendar, date);
                day_ordinal(days, date).map(|i| (i as i32, days.len()))
            };
            if let Some((day_index, month_len)) = ordinal {
                let spec = RollWindowSpec::for_month(roll_start, roll_end, month_len);
                spec.validate()?;

                // A negative window opens in the prior month's tail; its
                // head days (through the window end) still belong to that
                // cycle, so they keep the prior month's contract pair.
                let cycle_date = if roll_start < 0 && day_index <= roll_end {
                    prior_month_day(date)
                } else {
                    date
                };
                let pair = rolling_contracts(
                    &config.asset,
                    cycle_date,
                    &schedule,
                    config.contract_naming,
                )?;

                let current = match structure.take() {
                    Some(current) => current,
                    None => {
                        // Inception: the initial level buys the near contract
                        let price = self.prices.price_in_dollars(&pair.near, date)?;
                        IndexStructure::initial(config.index.initial_level, &pair.near, price)
                    }
                };

                let prices = self.collect_prices(&current, &pair, date)?;
                let phase = spec.phase(day_index);
                let roll_weight =
                    round_half_even(spec.weight(day_index), config.roll_rounding);
                let halted = halt_calendar
                    .map(|c| c.holidays.contains(&date))
                    .unwrap_or(false);

                let ctx = RebalanceContext {
                    date,
                    contracts: &pair,
                    prices: &prices,
                    phase,
                    roll_weight,
                    halted,
                };
                let (next, level) = rebalance::step(&current, &ctx)?;

                let published = round_half_even(level, config.index.rounding);
                debug!(symbol = %config.index.symbol, %date, level = published, "published");
                series.push((date, published));
                structure = Some(next);
            }
            date = date.succ_opt().expect("date within range");
        }
        Ok(series)
    }

    fn wav_ratio_series(
        &self,
        config: &WavIndexConfiguration,
        as_of: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let calendar = self
            .calendars
            .calendar_for(&config.index.publish_holiday_calendar)?;
        let (roll_start, roll_end) = config.roll_period;
        let mut schedules = BTreeMap::new();
        for asset in config.weights.keys() {
            schedules.insert(asset.clone(), config.schedule_for(asset)?);
        }

        let mut cache = BusinessDayCache::new();
        let mut state = WavRecurrenceState::initial(config.index.initial_level);
        let mut series = Vec::new();

        let mut date = config.index.start_date;
        while date <= as_of {
            let ordinal = {
                let days = cache.days_for(Period::Month, calendar, date);
                day_ordinal(days, date)
            };
            if let Some(day_index) = ordinal {
                // Non-negative start: first_day is the start itself
                let spec = RollWindowSpec::for_month(roll_start, roll_end, 0);
                spec.validate()?;
                let roll_weight = round_half_even(
                    spec.month_weight(day_index as i32),
                    config.roll_rounding,
                );

                let mut near_contracts = BTreeMap::new();
                let mut far_contracts = BTreeMap::new();
                let mut prices = ContractPrices::new();
                for asset in config.weights.keys() {
                    let pair = rolling_contracts(
                        asset,
                        date,
                        &schedules[asset],
                        config.contract_naming,
                    )?;
                    for contract in [&pair.near, &pair.far] {
                        if !prices.contains_key(contract.as_str()) {
                            let price = self.prices.price_in_dollars(contract, date)?;
                            prices.insert(contract.clone(), price);
                        }
                    }
                    near_contracts.insert(asset.clone(), pair.near);
                    far_contracts.insert(asset.clone(), pair.far);
                }

                let wav_near =
                    weighted_average(&config.weights, &near_contracts, &prices, date)?;
                let wav_far = weighted_average(&config.weights, &far_contracts, &prices, date)?;

                state = recurrence::step(
                    &state,
                    &config.index.symbol,
                    date,
                    wav_near,
                    wav_far,
                    roll_weight,
                    config.index.rounding,
                )?;
                debug!(symbol = %config.index.symbol, %date, level = state.level, "published");
                series.push((date, state.level));
            }
            date = date.succ_opt().expect("date within range");
        }
        Ok(series)
    }

    /// The effective contract weights of a WAV-ratio index on a date: each
    /// asset's composition weight split across its rolling pair at the
    /// day's roll weight, merged over assets
    pub fn index_weights(
        &self,
        config: &WavIndexConfiguration,
        date: NaiveDate,
    ) -> Result<BTreeMap<String, f64>> {
        config.validate()?;
        let calendar = self
            .calendars
            .calendar_for(&config.index.publish_holiday_calendar)?;
        let days = business_days(Period::Month, calendar, date);
        let day_index = day_ordinal(&days, date).ok_or_else(|| {
            IndexError::Configuration(format!("{date} is not a publishing day"))
        })? as i32;
        let (roll_start, roll_end) = config.roll_period;
        let spec = RollWindowSpec::for_month(roll_start, roll_end, days.len());
        let weight = round_half_even(spec.month_weight(day_index), config.roll_rounding);

        let mut per_asset = Vec::new();
        for (asset, composition) in &config.weights {
            let pair = rolling_contracts(
                asset,
                date,
                &config.schedule_for(asset)?,
                config.contract_naming,
            )?;
            per_asset.push(contract_weights(
                &pair,
                weight * composition,
                (1.0 - weight) * composition,
            ));
        }
        Ok(merge_contract_weights(per_asset))
    }

    /// Every contract the rebalance step can need a price for today:
    /// current holdings, the rolling pair, and any pending target
    fn collect_prices(
        &self,
        structure: &IndexStructure,
        pair: &crate::common::types::ContractPair,
        date: NaiveDate,
    ) -> Result<ContractPrices> {
        let mut contracts: BTreeSet<&str> = structure
            .current_position
            .units
            .keys()
            .chain(structure.previous_units.keys())
            .chain(structure.target_units.keys())
            .map(String::as_str)
            .collect();
        contracts.insert(&pair.near);
        contracts.insert(&pair.far);

        let mut prices = ContractPrices::new();
        for contract in contracts {
            let price = self.prices.price_in_dollars(contract, date)?;
            prices.insert(contract.to_string(), price);
        }
        Ok(prices)
    }
}
