//! Engine Integration Tests
//!
//! Full spin flow from draw to pool settlement.
//! Verifies:
//! - Pool accounting across many spins and several machines
//! - Payout cap and reserve under real draws
//! - Observer event stream over a channel
//! - Config files driving a machine

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rp_engine::{
    ChannelObserver, EngineConfig, PrizePool, PrizeTier, RngSource, SequenceSource, SlotMachine,
    SpinEvent, Symbol, TimingConfig, simulate, symbol_frequencies,
};

const WAGERS: [u64; 5] = [10_000, 25_000, 50_000, 100_000, 250_000];

fn instant_config() -> EngineConfig {
    EngineConfig {
        timing: TimingConfig::instant(),
        ..Default::default()
    }
}

fn chacha(seed: u64) -> RngSource<ChaCha8Rng> {
    RngSource::new(ChaCha8Rng::seed_from_u64(seed))
}

#[test]
fn test_pool_accounting_over_many_spins() {
    let mut machine = SlotMachine::new(instant_config(), chacha(2024));
    let start = machine.pool().balance();
    let mut paid = 0.0;

    for i in 0..2_000 {
        let before = machine.pool().balance();
        let result = machine.spin(WAGERS[i % WAGERS.len()]).unwrap();

        assert!(result.pool_payout >= 0.0);
        assert!(result.pool_payout <= before * 0.5 + 1e-12);
        assert_relative_eq!(result.pool_balance_after, before - result.pool_payout, epsilon = 1e-12);
        if !result.is_win() {
            assert_eq!(result.prize, PrizeTier::None);
            assert_eq!(result.pool_payout, 0.0);
        }
        paid += result.pool_payout;
    }

    assert_relative_eq!(machine.pool().balance(), start - paid, epsilon = 1e-9);
    assert_relative_eq!(machine.session().total_payout, paid, epsilon = 1e-9);
    assert_eq!(machine.session().total_spins, 2_000);
}

#[test]
fn test_concurrent_machines_share_pool() {
    let config = Arc::new(instant_config());
    let pool = Arc::new(PrizePool::new(1_000.0));

    let handles: Vec<_> = (0..4)
        .map(|seed| {
            let config = Arc::clone(&config);
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut machine = SlotMachine::with_pool(config, pool, chacha(seed));
                (0..500)
                    .map(|_| machine.spin(100_000).map(|r| r.pool_payout).unwrap_or(0.0))
                    .sum::<f64>()
            })
        })
        .collect();

    let paid: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_relative_eq!(pool.balance(), 1_000.0 - paid, epsilon = 1e-6);
    assert!(pool.balance() >= 0.0);
}

#[test]
fn test_reserve_excluded_from_prize_base() {
    let mut config = instant_config();
    config.pool_protection.reserve_percent = 0.6;
    config.pool_protection.max_single_payout = 1.0;
    config.initial_pool = 100.0;

    // Every spin is five sevens
    let mut machine = SlotMachine::new(config, SequenceSource::constant(0.0));
    let first = machine.spin(10_000).unwrap();
    assert_eq!(first.prize, PrizeTier::SuperJackpot);
    // 50% of the 40 left above the reserve
    assert_relative_eq!(first.pool_payout, 20.0, epsilon = 1e-9);
    assert_relative_eq!(machine.pool().balance(), 80.0, epsilon = 1e-9);
}

#[test]
fn test_channel_event_stream() {
    let (observer, rx) = ChannelObserver::unbounded();
    let mut machine = SlotMachine::new(EngineConfig::default(), chacha(11));
    machine.add_observer(Box::new(observer));

    for _ in 0..3 {
        machine.spin(25_000).unwrap();
    }

    let events: Vec<SpinEvent> = rx.try_iter().collect();
    assert_eq!(events.len(), 3 * 7);
    for (spin, chunk) in events.chunks(7).enumerate() {
        match &chunk[0] {
            SpinEvent::SpinStart { spin_id, wager } => {
                assert_eq!(spin_id, &format!("spin-{:06}", spin + 1));
                assert_eq!(*wager, 25_000);
            }
            other => panic!("expected start, got {:?}", other),
        }
        for (reel, event) in chunk[1..6].iter().enumerate() {
            assert!(matches!(event, SpinEvent::ReelStop { reel_index, .. } if *reel_index == reel));
        }
        match &chunk[6] {
            SpinEvent::SpinEnd { result } => {
                for reel in 0..5 {
                    let SpinEvent::ReelStop { column, .. } = &chunk[1 + reel] else {
                        unreachable!()
                    };
                    assert_eq!(result.grid.column(reel), Some(column));
                }
            }
            other => panic!("expected end, got {:?}", other),
        }
    }

    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "spin_start");
}

#[test]
fn test_yaml_config_drives_machine() {
    let yaml = r#"
initial_pool: 2.0
pool_protection:
  max_single_payout: 0.1
  reserve_percent: 0.0
timing:
  profile: instant
  first_stop_ms: 0.0
  reel_stop_interval_ms: 0.0
  brake_lead_ms: 0.0
  settle_delay_ms: 0.0
"#;
    let config = EngineConfig::from_yaml_str(yaml).unwrap();
    let mut machine = SlotMachine::new(config, SequenceSource::constant(0.0));
    let result = machine.spin(10_000).unwrap();

    // 50% tier capped to 10% of the pool
    assert_relative_eq!(result.pool_payout, 0.2);
    assert_relative_eq!(result.pool_percent_used, 0.1);
    assert_eq!(machine.elapsed_ms(), 0.0);
}

#[test]
fn test_higher_wager_draws_more_premium() {
    let config = EngineConfig::default();
    let low = symbol_frequencies(&mut chacha(5), &config, 10_000, 50_000);
    let high = symbol_frequencies(&mut chacha(5), &config, 250_000, 50_000);

    let premium = |counts: &[u64; 10]| Symbol::PREMIUM.iter().map(|s| counts[s.index()]).sum::<u64>();
    // 18.5% against 36.25% of draws
    assert!(premium(&high) > premium(&low) * 3 / 2);

    let low_report = simulate(&mut chacha(6), &config, 10_000, 20_000);
    assert_eq!(low_report.spins, 20_000);
    assert_eq!(low_report.count(PrizeTier::Consolation), 0);
}
