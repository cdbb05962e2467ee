//! Batch win-rate simulation
//!
//! Pure evaluation: grids are drawn and classified, but no pool is touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::grid::generate_grid;
use crate::payline::{evaluate, paylines};
use crate::prize::{PrizeTier, classify};
use crate::random::RandomSource;
use crate::symbols::{SYMBOL_COUNT, Symbol};

/// Aggregate outcome of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub wager: u64,
    pub spins: u64,
    pub wins: u64,
    /// Winning spins, percent
    pub win_rate: f64,
    /// Spins per classified tier (`none` included)
    pub prize_counts: BTreeMap<PrizeTier, u64>,
    pub five_match: u64,
    pub four_match: u64,
    pub three_match: u64,
}

impl SimulationReport {
    pub fn count(&self, tier: PrizeTier) -> u64 {
        self.prize_counts.get(&tier).copied().unwrap_or(0)
    }

    /// Tier count as a percentage of all spins
    pub fn tier_rate(&self, tier: PrizeTier) -> f64 {
        if self.spins > 0 {
            self.count(tier) as f64 / self.spins as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Spin `spins` grids at `wager` and tally the classifications
pub fn simulate<R: RandomSource + ?Sized>(
    rng: &mut R,
    config: &EngineConfig,
    wager: u64,
    spins: u64,
) -> SimulationReport {
    let lines = paylines();
    let mut report = SimulationReport {
        wager,
        spins,
        ..Default::default()
    };

    for _ in 0..spins {
        let grid = generate_grid(rng, &config.draw, wager);
        let win_lines = evaluate(&grid, &lines);
        let prize = classify(&win_lines);

        *report.prize_counts.entry(prize).or_insert(0) += 1;
        if !win_lines.is_empty() {
            report.wins += 1;
        }
        for line in &win_lines {
            match line.count {
                5 => report.five_match += 1,
                4 => report.four_match += 1,
                _ => report.three_match += 1,
            }
        }
    }

    if spins > 0 {
        report.win_rate = report.wins as f64 / spins as f64 * 100.0;
    }
    report
}

/// Draw `draws` single symbols and count each outcome
pub fn symbol_frequencies<R: RandomSource + ?Sized>(
    rng: &mut R,
    config: &EngineConfig,
    wager: u64,
    draws: u64,
) -> [u64; SYMBOL_COUNT] {
    let weights = config.draw.weights_for_wager(wager);
    let mut counts = [0_u64; SYMBOL_COUNT];
    for _ in 0..draws {
        counts[weights.draw(rng).index()] += 1;
    }
    counts
}

/// Counts as `(symbol, share in percent)` pairs
pub fn frequency_percents(counts: &[u64; SYMBOL_COUNT]) -> Vec<(Symbol, f64)> {
    let total: u64 = counts.iter().sum();
    Symbol::ALL
        .iter()
        .map(|s| {
            let share = if total > 0 {
                counts[s.index()] as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            (*s, share)
        })
        .collect()
}
