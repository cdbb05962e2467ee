//! Spin lifecycle notifications
//!
//! Per spin, observers see exactly one start, one stop per reel in reel
//! order, then exactly one end.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::Serialize;

use crate::grid::Column;
use crate::spin::SpinResult;

/// Receives spin lifecycle callbacks; every method defaults to a no-op
pub trait SpinObserver: Send {
    fn on_spin_start(&mut self, _spin_id: &str, _wager: u64) {}

    fn on_reel_stop(&mut self, _reel_index: usize, _column: &Column) {}

    fn on_spin_end(&mut self, _result: &SpinResult) {}
}

/// Owned event form of the observer callbacks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinEvent {
    SpinStart { spin_id: String, wager: u64 },
    ReelStop { reel_index: usize, column: Column },
    SpinEnd { result: Box<SpinResult> },
}

impl SpinEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            SpinEvent::SpinStart { .. } => "spin_start",
            SpinEvent::ReelStop { .. } => "reel_stop",
            SpinEvent::SpinEnd { .. } => "spin_end",
        }
    }
}

/// Forwards callbacks as [`SpinEvent`]s over a channel
///
/// Sends never block the spin: a full or disconnected channel drops the event.
pub struct ChannelObserver {
    tx: Sender<SpinEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<SpinEvent>) -> Self {
        Self { tx }
    }

    /// Observer plus the receiving end of an unbounded channel
    pub fn unbounded() -> (Self, Receiver<SpinEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    /// Observer plus the receiving end of a bounded channel
    pub fn bounded(capacity: usize) -> (Self, Receiver<SpinEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self::new(tx), rx)
    }

    fn send(&self, event: SpinEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::warn!("[ChannelObserver] channel full, dropping {}", event.type_name());
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl SpinObserver for ChannelObserver {
    fn on_spin_start(&mut self, spin_id: &str, wager: u64) {
        self.send(SpinEvent::SpinStart {
            spin_id: spin_id.to_string(),
            wager,
        });
    }

    fn on_reel_stop(&mut self, reel_index: usize, column: &Column) {
        self.send(SpinEvent::ReelStop {
            reel_index,
            column: *column,
        });
    }

    fn on_spin_end(&mut self, result: &SpinResult) {
        self.send(SpinEvent::SpinEnd {
            result: Box::new(result.clone()),
        });
    }
}

/// Ordered listener list
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<Box<dyn SpinObserver>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn SpinObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub(crate) fn spin_start(&mut self, spin_id: &str, wager: u64) {
        for observer in &mut self.observers {
            observer.on_spin_start(spin_id, wager);
        }
    }

    pub(crate) fn reel_stop(&mut self, reel_index: usize, column: &Column) {
        for observer in &mut self.observers {
            observer.on_reel_stop(reel_index, column);
        }
    }

    pub(crate) fn spin_end(&mut self, result: &SpinResult) {
        for observer in &mut self.observers {
            observer.on_spin_end(result);
        }
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, ROWS};
    use crate::symbols::Symbol;

    #[test]
    fn test_channel_observer_forwards_in_order() {
        let (observer, rx) = ChannelObserver::unbounded();
        let mut list = ObserverList::new();
        list.push(Box::new(observer));

        list.spin_start("spin-000001", 10_000);
        list.reel_stop(0, &[Symbol::Bell; ROWS]);
        let result = SpinResult::new("spin-000001".into(), 10_000, Grid::default(), Vec::new(), 1);
        list.spin_end(&result);

        let names: Vec<&str> = rx.try_iter().map(|e| e.type_name()).collect();
        assert_eq!(names, vec!["spin_start", "reel_stop", "spin_end"]);
    }

    #[test]
    fn test_full_channel_drops_without_blocking() {
        let (mut observer, rx) = ChannelObserver::bounded(1);
        observer.on_spin_start("a", 1);
        observer.on_spin_start("b", 1);
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_disconnected_channel_is_ignored() {
        let (mut observer, rx) = ChannelObserver::unbounded();
        drop(rx);
        observer.on_reel_stop(3, &[Symbol::Star; ROWS]);
    }
}
