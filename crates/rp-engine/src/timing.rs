//! Timing profiles and the reel-stop schedule
//!
//! Offsets are logical milliseconds from spin start. Nothing here sleeps; the
//! orchestrator is advanced by whoever drives it (a UI frame loop, the CLI, or
//! a test jumping straight to the end).

use serde::{Deserialize, Serialize};

use crate::grid::REELS;

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Everything at t = 0 (tests, batch runs)
    Instant,
    /// Scaled or hand-edited values
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Reel-stop timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Time until reel 0 stops (ms)
    pub first_stop_ms: f64,

    /// Delay between consecutive reel stops (ms)
    pub reel_stop_interval_ms: f64,

    /// How long before its stop a reel starts braking (ms)
    pub brake_lead_ms: f64,

    /// Delay between the last reel stop and settlement (ms)
    pub settle_delay_ms: f64,
}

impl TimingConfig {
    /// Reels stop at 400, 600, 800, 1000, 1200 ms; settles at 1400 ms
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            first_stop_ms: 400.0,
            reel_stop_interval_ms: 200.0,
            brake_lead_ms: 100.0,
            settle_delay_ms: 200.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            first_stop_ms: 200.0,
            reel_stop_interval_ms: 100.0,
            brake_lead_ms: 50.0,
            settle_delay_ms: 100.0,
        }
    }

    /// No delays at all
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            first_stop_ms: 0.0,
            reel_stop_interval_ms: 0.0,
            brake_lead_ms: 0.0,
            settle_delay_ms: 0.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            first_stop_ms: self.first_stop_ms * factor,
            reel_stop_interval_ms: self.reel_stop_interval_ms * factor,
            brake_lead_ms: self.brake_lead_ms * factor,
            settle_delay_ms: self.settle_delay_ms * factor,
        }
    }

    /// Stop offset for a reel
    pub fn reel_stop_at(&self, reel: usize) -> f64 {
        self.first_stop_ms + reel as f64 * self.reel_stop_interval_ms
    }

    /// Time from spin start to settlement
    pub fn total_spin_duration(&self) -> f64 {
        self.reel_stop_at(REELS - 1) + self.settle_delay_ms
    }

    /// Build the event schedule for one spin
    pub fn schedule(&self) -> SpinSchedule {
        SpinSchedule::from_timing(self)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// What happens at a scheduled instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Reel enters its stopping phase
    Brake(usize),
    /// Reel column is drawn and fixed
    Stop(usize),
    /// All reels are down; evaluate and pay
    Settle,
}

/// A scheduled action with its offset from spin start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub at_ms: f64,
    pub action: ScheduledAction,
}

/// Ordered event list for one spin
///
/// Stops are always in reel order and `Settle` is always last, whatever the
/// timing values.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSchedule {
    events: Vec<ScheduledEvent>,
}

impl SpinSchedule {
    pub fn from_timing(timing: &TimingConfig) -> Self {
        let mut events = Vec::with_capacity(REELS * 2 + 1);
        let mut last_stop = 0.0_f64;

        for reel in 0..REELS {
            // Monotonic even if a config has a negative interval
            let stop_at = timing.reel_stop_at(reel).max(last_stop).max(0.0);
            let brake_at = (stop_at - timing.brake_lead_ms.max(0.0)).max(0.0);
            events.push(ScheduledEvent {
                at_ms: brake_at,
                action: ScheduledAction::Brake(reel),
            });
            events.push(ScheduledEvent {
                at_ms: stop_at,
                action: ScheduledAction::Stop(reel),
            });
            last_stop = stop_at;
        }

        events.push(ScheduledEvent {
            at_ms: last_stop + timing.settle_delay_ms.max(0.0),
            action: ScheduledAction::Settle,
        });

        // Stable: equal offsets keep construction order
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        Self { events }
    }

    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScheduledEvent> {
        self.events.get(index)
    }

    /// Offset of the settle event
    pub fn duration(&self) -> f64 {
        self.events.last().map(|e| e.at_ms).unwrap_or(0.0)
    }
}
