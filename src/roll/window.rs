//! Monthly roll window resolution
//!
//! A roll window is a contiguous span of publishing days during which index
//! exposure transitions linearly from the near to the far contract. Day
//! positions are 1-based ordinals within the enumerated business days of a
//! month, not calendar days, so window day 1 may be the 3rd calendar day if
//! the 1st and 2nd were weekends.

use serde::{Deserialize, Serialize};

use crate::common::errors::{IndexError, Result};

/// Where a day sits relative to the roll window
///
/// `Before` means still fully on the near contract. `After` holds exactly
/// at the window end: the roll is complete, and the transition back to
/// `Before` is the edge that starts the next roll cycle. `During` is the
/// linear interpolation zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RollPhase {
    Before,
    During,
    After,
}

/// A monthly roll window
///
/// `start` may be negative, in which case the window opens in the previous
/// month at day index `first_day` (`first_day` equals `start` for
/// non-negative starts). `end` is the day index on which the roll completes
/// and must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollWindowSpec {
    pub start: i32,
    pub end: i32,
    pub first_day: i32,
}

impl RollWindowSpec {
    /// Build the spec for evaluating the days of one month, where
    /// `month_len` is that month's business-day count. A negative start
    /// places the opening tail of the next cycle's window in this month,
    /// beginning at day `month_len + start + 1`.
    pub fn for_month(start: i32, end: i32, month_len: usize) -> Self {
        let first_day = if start >= 0 {
            start
        } else {
            month_len as i32 + start + 1
        };
        Self {
            start,
            end,
            first_day,
        }
    }

    /// Reject windows that would overlap the prior roll cycle. Month-length
    /// independent violations are also caught earlier, at configuration
    /// validation; this check covers the month actually being priced.
    pub fn validate(&self) -> Result<()> {
        if self.end <= 0 || self.start >= self.end || (self.start < 0 && self.first_day <= self.end)
        {
            return Err(IndexError::RollWindowOverlap {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// The roll phase for a 1-based business-day-of-month index.
    ///
    /// Only `day_index == end` maps to `After`; later days of the month
    /// are `Before` the next cycle.
    pub fn phase(&self, day_index: i32) -> RollPhase {
        if day_index == self.end {
            RollPhase::After
        } else if (self.start < 0 && (day_index >= self.first_day || day_index < self.end))
            || (self.start >= 0 && day_index >= self.start && day_index < self.end)
        {
            RollPhase::During
        } else {
            RollPhase::Before
        }
    }

    /// Linear near-contract weight keyed off the roll phase: 1.0 before the
    /// window, 0.0 at its end, and a straight-line interpolation between.
    /// For the canonical [5,10] window this yields exactly
    /// {1.0, 0.8, 0.6, 0.4, 0.2, 0.0} over day indices 5 through 10.
    pub fn weight(&self, day_index: i32) -> f64 {
        match self.phase(day_index) {
            RollPhase::Before => 1.0,
            RollPhase::After => 0.0,
            RollPhase::During => {
                let v = self.virtual_index(day_index);
                (self.end - v) as f64 / (self.end - self.start) as f64
            }
        }
    }

    /// Near-contract weight over the window's own month: 1.0 before the
    /// window opens, interpolated inside it, and 0.0 from the window end
    /// through month end. This is the weight the weighted-average-value
    /// recurrence uses, where exposure stays on the far contract until the
    /// contract pair itself rolls at the month boundary. Only meaningful
    /// for non-negative window starts.
    pub fn month_weight(&self, day_index: i32) -> f64 {
        let raw = (self.end - day_index) as f64 / (self.end - self.start) as f64;
        raw.clamp(0.0, 1.0)
    }

    /// Map a day index onto the window's linear scale, folding prior-month
    /// tail days below zero
    fn virtual_index(&self, day_index: i32) -> i32 {
        if self.start < 0 && day_index >= self.first_day {
            day_index - self.first_day + self.start + 1
        } else {
            day_index
        }
    }
}
