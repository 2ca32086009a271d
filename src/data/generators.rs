//! Synthetic price streams for demos and tests

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Gaussian white-noise generator with a fixed seed, so generated series
/// are reproducible across runs
#[derive(Debug)]
pub struct WhiteNoise {
    normal: Normal<f64>,
    rng: StdRng,
}

impl WhiteNoise {
    /// A seeded stream of draws from N(loc, scale)
    pub fn seeded(seed: u64, loc: f64, scale: f64) -> Self {
        Self {
            normal: Normal::new(loc, scale).expect("scale must be finite and non-negative"),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The next draw
    pub fn sample(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }

    /// A dated daily series of `initial` plus accumulated noise, one
    /// observation per calendar day starting at `start`
    pub fn dated_walk(
        &mut self,
        start: NaiveDate,
        days: usize,
        initial: f64,
    ) -> Vec<(NaiveDate, f64)> {
        let mut value = initial;
        start
            .iter_days()
            .take(days)
            .map(|date| {
                value += self.sample();
                (date, value)
            })
            .collect()
    }
}
