//! Spin result snapshot

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::payline::WinLine;
use crate::pool::PoolSettlement;
use crate::prize::{PrizeInfo, PrizeTier};

/// Complete outcome of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Spin ID
    pub spin_id: String,
    /// Wager the spin was drawn with
    pub wager: u64,
    /// Final grid (reels × rows)
    pub grid: Grid,
    /// Line wins
    pub win_lines: Vec<WinLine>,
    /// Classified tier
    pub prize: PrizeTier,
    /// Table entry for the tier (absent for `none`)
    pub prize_info: Option<PrizeInfo>,
    /// Amount taken from the pool
    pub pool_payout: f64,
    /// Share of the pool the payout used
    pub pool_percent_used: f64,
    /// Pool balance once this spin was paid
    pub pool_balance_after: f64,
    /// Super jackpot or jackpot
    pub is_jackpot: bool,
    /// Winning lines / evaluated lines
    pub hit_rate: f64,
}

impl SpinResult {
    pub fn new(
        spin_id: String,
        wager: u64,
        grid: Grid,
        win_lines: Vec<WinLine>,
        line_count: usize,
    ) -> Self {
        let hit_rate = if line_count > 0 {
            win_lines.len() as f64 / line_count as f64
        } else {
            0.0
        };
        Self {
            spin_id,
            wager,
            grid,
            win_lines,
            prize: PrizeTier::None,
            prize_info: None,
            pool_payout: 0.0,
            pool_percent_used: 0.0,
            pool_balance_after: 0.0,
            is_jackpot: false,
            hit_rate,
        }
    }

    /// Apply the classified tier
    pub fn with_prize(mut self, prize: PrizeTier, info: Option<PrizeInfo>) -> Self {
        self.prize = prize;
        self.prize_info = info;
        self.is_jackpot = prize.is_jackpot();
        self
    }

    /// Apply the pool settlement
    pub fn with_settlement(mut self, settlement: &PoolSettlement) -> Self {
        self.pool_payout = settlement.payout.payout;
        self.pool_percent_used = settlement.payout.percent_used;
        self.pool_balance_after = settlement.balance_after;
        self
    }

    /// At least one winning line
    pub fn is_win(&self) -> bool {
        !self.win_lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolPayout;
    use crate::symbols::Symbol;

    #[test]
    fn test_builder() {
        let lines = vec![WinLine::new(0, Symbol::Seven, 4)];
        let result = SpinResult::new("spin-000001".into(), 10_000, Grid::filled(Symbol::Seven), lines, 1)
            .with_prize(PrizeTier::Jackpot, None)
            .with_settlement(&PoolSettlement {
                payout: PoolPayout {
                    payout: 2.5,
                    percent_used: 0.25,
                },
                balance_before: 10.0,
                balance_after: 7.5,
            });

        assert!(result.is_win());
        assert!(result.is_jackpot);
        assert_eq!(result.hit_rate, 1.0);
        assert_eq!(result.pool_payout, 2.5);
        assert_eq!(result.pool_balance_after, 7.5);
    }

    #[test]
    fn test_losing_spin_defaults() {
        let result = SpinResult::new("spin-000002".into(), 10_000, Grid::default(), Vec::new(), 1);
        assert!(!result.is_win());
        assert_eq!(result.hit_rate, 0.0);
        assert_eq!(result.prize, PrizeTier::None);
    }

    #[test]
    fn test_json_shape() {
        let result = SpinResult::new("spin-000003".into(), 25_000, Grid::default(), Vec::new(), 1);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["prize"], "none");
        assert_eq!(json["wager"], 25_000);
        let back: SpinResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
