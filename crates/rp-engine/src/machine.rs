//! Spin orchestrator
//!
//! `SlotMachine` drives one spin at a time through `Idle → Spinning →
//! Settling → Idle`. Reels stop one by one on a logical clock; the pool is
//! only touched at settlement.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::SpinError;
use crate::grid::{Grid, REELS, draw_column};
use crate::observer::{ObserverList, SpinObserver};
use crate::payline::{Payline, evaluate, paylines};
use crate::pool::PrizePool;
use crate::prize::classify;
use crate::random::{RandomSource, RngSource};
use crate::spin::SpinResult;
use crate::timing::{ScheduledAction, SpinSchedule, TimingConfig};

/// Machine-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    Idle,
    Spinning,
    Settling,
}

/// Per-reel phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelState {
    Spinning,
    Stopping,
    Stopped,
}

/// Running session counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub total_spins: u64,
    pub total_wins: u64,
    /// Consecutive winning spins
    pub combo: u32,
    pub max_combo: u32,
    /// Sum of all pool payouts
    pub total_payout: f64,
    pub jackpots: u64,
    pub last_result: Option<SpinResult>,
}

impl SessionState {
    /// Winning spins as a percentage of all spins
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.total_wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        if result.is_win() {
            self.total_wins += 1;
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }
        if result.is_jackpot {
            self.jackpots += 1;
        }
        self.total_payout += result.pool_payout;
        self.last_result = Some(result.clone());
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    spin_id: String,
    wager: u64,
}

/// Slot machine orchestrator
pub struct SlotMachine<R: RandomSource = RngSource<StdRng>> {
    config: Arc<EngineConfig>,
    pool: Arc<PrizePool>,
    rng: R,
    paylines: Vec<Payline>,
    timing: TimingConfig,
    phase: SpinPhase,
    reels: [ReelState; REELS],
    grid: Grid,
    schedule: SpinSchedule,
    cursor: usize,
    clock_ms: f64,
    in_flight: Option<InFlight>,
    spin_count: u64,
    observers: ObserverList,
    session: SessionState,
}

impl SlotMachine<RngSource<StdRng>> {
    /// Machine seeded from OS entropy with its own pool
    pub fn from_entropy(config: EngineConfig) -> Self {
        Self::new(config, RngSource::from_entropy())
    }

    /// Reproducible machine
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, RngSource::seeded(seed))
    }
}

impl<R: RandomSource> SlotMachine<R> {
    /// Machine with its own pool funded from `config.initial_pool`
    pub fn new(config: EngineConfig, rng: R) -> Self {
        let pool = Arc::new(PrizePool::new(config.initial_pool));
        Self::with_pool(Arc::new(config), pool, rng)
    }

    /// Machine settling against a shared pool
    pub fn with_pool(config: Arc<EngineConfig>, pool: Arc<PrizePool>, rng: R) -> Self {
        let timing = config.timing;
        Self {
            schedule: timing.schedule(),
            paylines: paylines(),
            config,
            pool,
            rng,
            timing,
            phase: SpinPhase::Idle,
            reels: [ReelState::Stopped; REELS],
            grid: Grid::default(),
            cursor: 0,
            clock_ms: 0.0,
            in_flight: None,
            spin_count: 0,
            observers: ObserverList::new(),
            session: SessionState::default(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SpinObserver>) {
        self.observers.push(observer);
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Timing for spins started from now on
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<PrizePool> {
        &self.pool
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase != SpinPhase::Idle
    }

    pub fn reel_states(&self) -> &[ReelState; REELS] {
        &self.reels
    }

    /// Stopped reels show this spin's column, the rest the previous grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn reset_session(&mut self) {
        self.session = SessionState::default();
    }

    /// Logical time since the current spin started
    pub fn elapsed_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Time until the next scheduled event; `None` when idle
    pub fn next_event_in(&self) -> Option<f64> {
        if self.phase == SpinPhase::Idle {
            return None;
        }
        self.schedule
            .get(self.cursor)
            .map(|e| (e.at_ms - self.clock_ms).max(0.0))
    }

    /// Start a spin; results arrive through [`advance`](Self::advance)
    pub fn begin_spin(&mut self, wager: u64) -> Result<(), SpinError> {
        if self.phase != SpinPhase::Idle {
            return Err(SpinError::SpinInProgress);
        }

        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);

        self.schedule = self.timing.schedule();
        self.cursor = 0;
        self.clock_ms = 0.0;
        self.reels = [ReelState::Spinning; REELS];
        self.phase = SpinPhase::Spinning;

        log::debug!("[SlotMachine] {} started, wager {}", spin_id, wager);
        self.observers.spin_start(&spin_id, wager);
        self.in_flight = Some(InFlight { spin_id, wager });
        Ok(())
    }

    /// Move the logical clock and run every event now due
    ///
    /// Returns the result once the spin settles.
    pub fn advance(&mut self, elapsed_ms: f64) -> Result<Option<SpinResult>, SpinError> {
        if self.phase == SpinPhase::Idle {
            return Err(SpinError::NoSpinInFlight);
        }
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.clock_ms += elapsed_ms;
        } else if elapsed_ms == f64::INFINITY {
            self.clock_ms = self.schedule.duration().max(self.clock_ms);
        }
        Ok(self.run_due())
    }

    /// Begin a spin and run its whole schedule
    pub fn spin(&mut self, wager: u64) -> Result<SpinResult, SpinError> {
        self.begin_spin(wager)?;
        loop {
            if let Some(event) = self.schedule.get(self.cursor) {
                self.clock_ms = self.clock_ms.max(event.at_ms);
            }
            if let Some(result) = self.run_due() {
                return Ok(result);
            }
            if self.phase == SpinPhase::Idle {
                return Err(SpinError::NoSpinInFlight);
            }
        }
    }

    fn run_due(&mut self) -> Option<SpinResult> {
        while let Some(event) = self.schedule.get(self.cursor).copied() {
            if event.at_ms > self.clock_ms {
                break;
            }
            self.cursor += 1;

            match event.action {
                ScheduledAction::Brake(reel) => {
                    if self.reels[reel] == ReelState::Spinning {
                        self.reels[reel] = ReelState::Stopping;
                    }
                }
                ScheduledAction::Stop(reel) => self.stop_reel(reel),
                ScheduledAction::Settle => return self.settle(),
            }
        }
        None
    }

    fn stop_reel(&mut self, reel: usize) {
        let wager = self.in_flight.as_ref().map(|f| f.wager).unwrap_or_default();
        let column = draw_column(&mut self.rng, &self.config.draw, wager);
        self.grid.set_column(reel, column);
        self.reels[reel] = ReelState::Stopped;

        log::debug!(
            "[SlotMachine] reel {} stopped at {:.0}ms: {}{}{}",
            reel,
            self.clock_ms,
            column[0].emoji(),
            column[1].emoji(),
            column[2].emoji()
        );
        self.observers.reel_stop(reel, &column);
    }

    fn settle(&mut self) -> Option<SpinResult> {
        let flight = self.in_flight.take()?;
        self.phase = SpinPhase::Settling;

        let win_lines = evaluate(&self.grid, &self.paylines);
        let prize = classify(&win_lines);
        let info = self.config.prizes.get(prize).cloned();
        let settlement = self
            .pool
            .settle(prize, &self.config.prizes, &self.config.pool_protection);

        let result = SpinResult::new(flight.spin_id, flight.wager, self.grid, win_lines, self.paylines.len())
            .with_prize(prize, info)
            .with_settlement(&settlement);

        log::debug!(
            "[SlotMachine] {} settled: {} paid {:.4} (pool {:.4} -> {:.4})",
            result.spin_id,
            prize,
            settlement.payout.payout,
            settlement.balance_before,
            settlement.balance_after
        );
        if result.is_jackpot {
            log::info!("[SlotMachine] {} hit {} for {:.4}", result.spin_id, prize, result.pool_payout);
        }

        self.session.record(&result);
        self.observers.spin_end(&result);
        self.phase = SpinPhase::Idle;
        Some(result)
    }
}

impl<R: RandomSource> std::fmt::Debug for SlotMachine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotMachine")
            .field("phase", &self.phase)
            .field("reels", &self.reels)
            .field("clock_ms", &self.clock_ms)
            .field("spin_count", &self.spin_count)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
