//! Weighted symbol draw
//!
//! A wager maps to a probability multiplier. Each premium symbol gets
//! `min(base + (multiplier - 1) * slope, ceiling)` percent of the space, the
//! filler symbols share what is left, and a roll in `[0, 100)` is matched
//! against the cumulative thresholds in symbol index order.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::symbols::{SYMBOL_COUNT, Symbol};

/// Percentage space a roll is scaled into
pub const PROBABILITY_SPACE: f64 = 100.0;

/// Draw weight of a premium symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumWeight {
    pub symbol: Symbol,
    /// Percent at multiplier 1
    pub base: f64,
    /// Percent added per unit of multiplier above 1
    pub slope: f64,
    /// Hard per-symbol maximum
    pub ceiling: f64,
}

impl PremiumWeight {
    pub const fn new(symbol: Symbol, base: f64, slope: f64, ceiling: f64) -> Self {
        Self {
            symbol,
            base,
            slope,
            ceiling,
        }
    }

    /// Weight that scales proportionally with the multiplier (`base * m`)
    pub const fn proportional(symbol: Symbol, base: f64, ceiling: f64) -> Self {
        Self::new(symbol, base, base, ceiling)
    }

    /// Percent chance at the given multiplier
    pub fn chance(&self, multiplier: f64) -> f64 {
        (self.base + (multiplier - 1.0) * self.slope)
            .min(self.ceiling)
            .max(0.0)
    }
}

/// How the remainder is divided between the filler symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CommonSplit {
    /// Equal fifths
    Even,
    /// Fixed shares in `Symbol::FILLER` order, summing to 1
    Proportional { shares: [f64; 5] },
}

impl CommonSplit {
    pub fn shares(&self) -> [f64; 5] {
        match self {
            CommonSplit::Even => [0.2; 5],
            CommonSplit::Proportional { shares } => *shares,
        }
    }
}

impl Default for CommonSplit {
    fn default() -> Self {
        Self::Even
    }
}

/// A fixed wager denomination and its probability multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagerTier {
    pub amount: u64,
    pub multiplier: f64,
}

impl WagerTier {
    pub const fn new(amount: u64, multiplier: f64) -> Self {
        Self { amount, multiplier }
    }
}

/// Standard five wager denominations
pub fn standard_wager_tiers() -> Vec<WagerTier> {
    vec![
        WagerTier::new(10_000, 1.0),
        WagerTier::new(25_000, 1.3),
        WagerTier::new(50_000, 1.8),
        WagerTier::new(100_000, 2.5),
        WagerTier::new(250_000, 3.5),
    ]
}

/// Draw configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawTable {
    pub premium: Vec<PremiumWeight>,
    pub common_split: CommonSplit,
    pub wager_tiers: Vec<WagerTier>,
}

impl Default for DrawTable {
    fn default() -> Self {
        Self {
            premium: vec![
                PremiumWeight::proportional(Symbol::Seven, 1.5, 5.0),
                PremiumWeight::proportional(Symbol::Diamond, 2.0, 7.0),
                PremiumWeight::proportional(Symbol::Crown, 3.0, 9.0),
                PremiumWeight::new(Symbol::Bell, 5.0, 0.8, 8.0),
                PremiumWeight::new(Symbol::Star, 7.0, 0.5, 9.0),
            ],
            common_split: CommonSplit::Even,
            wager_tiers: standard_wager_tiers(),
        }
    }
}

impl DrawTable {
    /// Multiplier for a wager; unknown amounts get the base multiplier
    pub fn multiplier_for(&self, wager: u64) -> f64 {
        self.wager_tiers
            .iter()
            .find(|t| t.amount == wager)
            .map(|t| t.multiplier)
            .unwrap_or(1.0)
    }

    /// Per-symbol percentages at a raw multiplier
    pub fn weights_at(&self, multiplier: f64) -> SymbolWeights {
        let mut percents = [0.0; SYMBOL_COUNT];
        for weight in &self.premium {
            percents[weight.symbol.index()] = weight.chance(multiplier);
        }

        let premium_total: f64 = Symbol::PREMIUM.iter().map(|s| percents[s.index()]).sum();
        let remaining = (PROBABILITY_SPACE - premium_total).max(0.0);
        for (symbol, share) in Symbol::FILLER.iter().zip(self.common_split.shares()) {
            percents[symbol.index()] = remaining * share;
        }

        SymbolWeights::new(percents)
    }

    /// Per-symbol percentages for a wager
    pub fn weights_for_wager(&self, wager: u64) -> SymbolWeights {
        self.weights_at(self.multiplier_for(wager))
    }

    /// Draw one symbol for a wager
    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R, wager: u64) -> Symbol {
        self.weights_for_wager(wager).draw(rng)
    }
}

/// Resolved per-symbol percentages with cumulative thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolWeights {
    percents: [f64; SYMBOL_COUNT],
    thresholds: [f64; SYMBOL_COUNT],
}

impl SymbolWeights {
    pub fn new(percents: [f64; SYMBOL_COUNT]) -> Self {
        let mut thresholds = [0.0; SYMBOL_COUNT];
        let mut running = 0.0;
        for (threshold, percent) in thresholds.iter_mut().zip(percents) {
            running += percent;
            *threshold = running;
        }
        Self {
            percents,
            thresholds,
        }
    }

    pub fn percent(&self, symbol: Symbol) -> f64 {
        self.percents[symbol.index()]
    }

    /// Probability in `[0, 1]`
    pub fn probability(&self, symbol: Symbol) -> f64 {
        self.percent(symbol) / PROBABILITY_SPACE
    }

    pub fn percents(&self) -> &[f64; SYMBOL_COUNT] {
        &self.percents
    }

    /// Ascending cumulative thresholds in symbol index order
    pub fn thresholds(&self) -> &[f64; SYMBOL_COUNT] {
        &self.thresholds
    }

    pub fn total(&self) -> f64 {
        self.thresholds[SYMBOL_COUNT - 1]
    }

    /// Symbol for a roll in `[0, 100)`
    ///
    /// Rolls at or beyond the last threshold fall back to the last symbol.
    pub fn pick(&self, roll: f64) -> Symbol {
        self.thresholds
            .iter()
            .position(|&threshold| roll < threshold)
            .and_then(Symbol::from_index)
            .unwrap_or(Symbol::Clover)
    }

    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Symbol {
        self.pick(rng.next_uniform() * PROBABILITY_SPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};
    use approx::assert_relative_eq;

    #[test]
    fn test_base_weights() {
        let table = DrawTable::default();
        let w = table.weights_for_wager(10_000);

        assert_relative_eq!(w.percent(Symbol::Seven), 1.5);
        assert_relative_eq!(w.percent(Symbol::Diamond), 2.0);
        assert_relative_eq!(w.percent(Symbol::Crown), 3.0);
        assert_relative_eq!(w.percent(Symbol::Bell), 5.0);
        assert_relative_eq!(w.percent(Symbol::Star), 7.0);
        // (100 - 18.5) / 5
        for symbol in Symbol::FILLER {
            assert_relative_eq!(w.percent(symbol), 16.3, epsilon = 1e-9);
        }
        assert_relative_eq!(w.total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_wager_uses_base_multiplier() {
        let table = DrawTable::default();
        assert_eq!(table.multiplier_for(12_345), 1.0);
        assert_eq!(table.multiplier_for(0), 1.0);
        assert_eq!(table.weights_for_wager(777), table.weights_for_wager(10_000));
    }

    #[test]
    fn test_top_tier_hits_ceilings() {
        let table = DrawTable::default();
        let w = table.weights_for_wager(250_000);

        // 1.5 * 3.5 = 5.25, capped
        assert_relative_eq!(w.percent(Symbol::Seven), 5.0);
        assert_relative_eq!(w.percent(Symbol::Diamond), 7.0);
        // 3 * 3.5 = 10.5, capped
        assert_relative_eq!(w.percent(Symbol::Crown), 9.0);
        // 5 + 2.5 * 0.8 = 7
        assert_relative_eq!(w.percent(Symbol::Bell), 7.0, epsilon = 1e-9);
        // 7 + 2.5 * 0.5 = 8.25
        assert_relative_eq!(w.percent(Symbol::Star), 8.25, epsilon = 1e-9);
    }

    #[test]
    fn test_ceilings_hold_for_growing_multiplier() {
        let table = DrawTable::default();
        for step in 0..200 {
            let multiplier = 1.0 + step as f64 * 0.5;
            let w = table.weights_at(multiplier);
            for weight in &table.premium {
                assert!(w.percent(weight.symbol) <= weight.ceiling);
            }
            assert!(w.total() <= PROBABILITY_SPACE + 1e-9);
            assert!(w.percents().iter().all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn test_pick_thresholds() {
        let w = DrawTable::default().weights_for_wager(10_000);
        assert_eq!(w.pick(0.0), Symbol::Seven);
        assert_eq!(w.pick(1.49), Symbol::Seven);
        assert_eq!(w.pick(1.5), Symbol::Diamond);
        assert_eq!(w.pick(3.5), Symbol::Crown);
        assert_eq!(w.pick(18.49), Symbol::Star);
        assert_eq!(w.pick(18.5), Symbol::Cherry);
        assert_eq!(w.pick(99.99), Symbol::Clover);
    }

    #[test]
    fn test_roll_past_thresholds_falls_back_to_last_symbol() {
        let w = SymbolWeights::new([5.0; SYMBOL_COUNT]);
        assert_relative_eq!(w.total(), 50.0);
        assert_eq!(w.pick(49.9), Symbol::Clover);
        assert_eq!(w.pick(75.0), Symbol::Clover);
    }

    #[test]
    fn test_proportional_split() {
        let table = DrawTable {
            common_split: CommonSplit::Proportional {
                shares: [0.30, 0.28, 0.22, 0.12, 0.08],
            },
            ..Default::default()
        };
        let w = table.weights_for_wager(10_000);
        let remaining = 100.0 - 18.5;
        assert_relative_eq!(w.percent(Symbol::Cherry), remaining * 0.30, epsilon = 1e-9);
        assert_relative_eq!(w.percent(Symbol::Clover), remaining * 0.08, epsilon = 1e-9);
        assert_relative_eq!(w.total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_draw_uses_one_sample() {
        let table = DrawTable::default();
        let mut rng = SequenceSource::new([0.0, 0.999]);
        assert_eq!(table.draw(&mut rng, 10_000), Symbol::Seven);
        assert_eq!(table.draw(&mut rng, 10_000), Symbol::Clover);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn test_empirical_frequencies_every_tier() {
        const DRAWS: usize = 100_000;
        let table = DrawTable::default();

        for (i, tier) in table.wager_tiers.iter().enumerate() {
            let mut rng = RngSource::seeded(0xD3A7 + i as u64);
            let weights = table.weights_for_wager(tier.amount);
            let mut counts = [0usize; SYMBOL_COUNT];
            for _ in 0..DRAWS {
                counts[weights.draw(&mut rng).index()] += 1;
            }

            assert_eq!(counts.iter().sum::<usize>(), DRAWS);
            for symbol in Symbol::ALL {
                let observed = counts[symbol.index()] as f64 / DRAWS as f64 * 100.0;
                let expected = weights.percent(symbol);
                assert!(
                    (observed - expected).abs() < 1.0,
                    "tier {} symbol {}: observed {:.2}% expected {:.2}%",
                    tier.amount,
                    symbol,
                    observed,
                    expected
                );
            }
        }
    }
}
