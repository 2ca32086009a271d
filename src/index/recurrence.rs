//! Ratio-of-sums settlement recurrence
//!
//! The weighted-average-value realization of the settlement level. Each
//! day's level is the previous day's level scaled by the ratio of today's
//! blended WAV to yesterday's blended WAV:
//!
//! ```text
//! level = level_prev * (wav_near*w + wav_far*(1-w))
//!                    / (wav_near_prev*w + wav_far_prev*(1-w))
//! ```
//!
//! where `w` is the near-contract roll weight for the day. On the first
//! day of a new roll period the former far contract has become the near
//! contract, so the previous-day near WAV is reinterpreted as the previous
//! day's *far* WAV.

use chrono::NaiveDate;
use tracing::debug;

use crate::common::errors::{IndexError, Result};
use crate::common::types::round_half_even;

/// The recurrence carrier for the WAV-ratio realization
///
/// This is the sole persistent artifact between evaluations. It is created
/// at index inception, advanced exactly once per business day, and must be
/// fed back explicitly; the step function never reads prior output through
/// any other channel, so re-stepping a day from the same input state is
/// idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct WavRecurrenceState {
    pub level: f64,
    pub wav_near_prev: f64,
    pub wav_far_prev: f64,
    pub roll_weight_prev: f64,
}

impl WavRecurrenceState {
    /// Seed the recurrence at index inception
    pub fn initial(level: f64) -> Self {
        Self {
            level,
            wav_near_prev: 0.0,
            wav_far_prev: 0.0,
            roll_weight_prev: 0.0,
        }
    }
}

/// Advance the recurrence by one business day.
///
/// `rounding` is the decimal precision of the published level, applied
/// half-to-even. A zero denominator scales the level by exactly 1.0 — the
/// level carries forward unchanged — by methodology, not as an error. A
/// non-finite result is rejected as `NonFiniteLevel` and nothing is
/// published.
pub fn step(
    state: &WavRecurrenceState,
    symbol: &str,
    date: NaiveDate,
    wav_near: f64,
    wav_far: f64,
    roll_weight: f64,
    rounding: u32,
) -> Result<WavRecurrenceState> {
    // A roll weight returning to 1.0 marks the first day of a new roll
    // period: the contract pair has shifted, and what was the far side
    // yesterday is the near side today.
    let new_period = roll_weight == 1.0 && state.roll_weight_prev != 1.0;
    let wav_near_prev = if new_period {
        debug!(symbol, %date, "new roll period, re-basing near WAV");
        state.wav_far_prev
    } else {
        state.wav_near_prev
    };
    let wav_far_prev = state.wav_far_prev;

    let numerator = wav_near * roll_weight + wav_far * (1.0 - roll_weight);
    let denominator = wav_near_prev * roll_weight + wav_far_prev * (1.0 - roll_weight);
    let ratio = if denominator == 0.0 {
        1.0
    } else {
        numerator / denominator
    };

    let level = round_half_even(state.level * ratio, rounding);
    if !level.is_finite() {
        return Err(IndexError::NonFiniteLevel {
            symbol: symbol.to_string(),
            date,
        });
    }

    Ok(WavRecurrenceState {
        level,
        wav_near_prev: wav_near,
        wav_far_prev: wav_far,
        roll_weight_prev: roll_weight,
    })
}
