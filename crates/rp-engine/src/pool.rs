//! Prize pool payout calculation and the shared pool balance

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::prize::{PrizeTable, PrizeTier};

/// Safety limits applied to every payout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolProtection {
    /// Largest share of the current pool a single spin may take
    pub max_single_payout: f64,
    /// Share of the pool held back from prize calculation
    pub reserve_percent: f64,
}

impl Default for PoolProtection {
    fn default() -> Self {
        Self {
            max_single_payout: 0.5,
            reserve_percent: 0.0,
        }
    }
}

/// Payout for one spin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolPayout {
    pub payout: f64,
    /// `payout / pool` at the time of calculation
    pub percent_used: f64,
}

impl PoolPayout {
    pub const ZERO: PoolPayout = PoolPayout {
        payout: 0.0,
        percent_used: 0.0,
    };
}

/// Payout for a tier against a pool balance
///
/// Pure: the caller is responsible for decrementing the pool.
pub fn calculate_payout(
    tier: PrizeTier,
    pool: f64,
    prizes: &PrizeTable,
    protection: &PoolProtection,
) -> PoolPayout {
    if !tier.is_win() || !pool.is_finite() || pool <= 0.0 {
        return PoolPayout::ZERO;
    }
    let Some(prize) = prizes.get(tier) else {
        return PoolPayout::ZERO;
    };

    let available = pool * (1.0 - protection.reserve_percent);
    let base = available * prize.pool_percent;
    let cap = pool * protection.max_single_payout;
    let payout = base.min(cap).clamp(0.0, pool);

    PoolPayout {
        payout,
        percent_used: payout / pool,
    }
}

/// Settlement of one spin against the shared pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSettlement {
    pub payout: PoolPayout,
    pub balance_before: f64,
    pub balance_after: f64,
}

/// Shared prize pool balance
///
/// Calculation and decrement happen under one lock, so two machines settling
/// against the same pool never both pay from the same pre-decrement balance.
#[derive(Debug)]
pub struct PrizePool {
    balance: Mutex<f64>,
}

impl PrizePool {
    /// Negative or non-finite balances start at zero
    pub fn new(balance: f64) -> Self {
        Self {
            balance: Mutex::new(sanitize(balance)),
        }
    }

    pub fn balance(&self) -> f64 {
        *self.balance.lock()
    }

    /// Add funds; non-positive or non-finite amounts are ignored
    pub fn deposit(&self, amount: f64) -> f64 {
        let mut balance = self.balance.lock();
        if amount.is_finite() && amount > 0.0 {
            *balance += amount;
        } else {
            log::warn!("[PrizePool] ignoring deposit of {}", amount);
        }
        *balance
    }

    /// Compute the payout for `tier` and take it from the pool atomically
    pub fn settle(
        &self,
        tier: PrizeTier,
        prizes: &PrizeTable,
        protection: &PoolProtection,
    ) -> PoolSettlement {
        let mut balance = self.balance.lock();
        let before = *balance;
        let payout = calculate_payout(tier, before, prizes, protection);

        if tier.is_win() && before <= 0.0 {
            log::warn!("[PrizePool] {} won against an empty pool", tier);
        }

        *balance = (before - payout.payout).max(0.0);
        PoolSettlement {
            payout,
            balance_before: before,
            balance_after: *balance,
        }
    }
}

impl Default for PrizePool {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INITIAL_POOL)
    }
}

fn sanitize(balance: f64) -> f64 {
    if balance.is_finite() { balance.max(0.0) } else { 0.0 }
}
