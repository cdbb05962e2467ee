//! rp-sim — Slot Engine Simulator
//!
//! Usage:
//!   rp-sim simulate             - Win-rate table for every wager tier
//!   rp-sim frequencies          - Empirical symbol shares per wager tier
//!   rp-sim play                 - Spin the orchestrator and log every event
//!   rp-sim config               - Print the default engine configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rp_engine::{
    Column, EngineConfig, PrizePool, PrizeTier, RngSource, SimulationReport, SlotMachine, SpinObserver,
    SpinResult, Symbol, TimingConfig, TimingProfile, frequency_percents, simulate, symbol_frequencies,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "rp-sim", about = "Slot outcome engine simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate every wager tier in parallel
    Simulate {
        /// Spins per wager tier
        #[arg(short, long, default_value_t = 100_000)]
        spins: u64,
        /// Base seed (each tier derives its own)
        #[arg(long)]
        seed: Option<u64>,
        /// YAML or JSON engine config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Count single-symbol draws per wager tier
    Frequencies {
        /// Draws per wager tier
        #[arg(short, long, default_value_t = 100_000)]
        draws: u64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run spins through the orchestrator
    Play {
        #[arg(short, long, default_value_t = 10_000)]
        wager: u64,
        #[arg(short, long, default_value_t = 10)]
        spins: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Reel timing profile (overrides the config)
        #[arg(short, long, value_enum)]
        profile: Option<ProfileArg>,
        /// Sleep between reel events instead of jumping the clock
        #[arg(long)]
        realtime: bool,
        /// Starting pool balance (overrides the config)
        #[arg(long)]
        pool: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration
    Config {
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Normal,
    Turbo,
    Instant,
}

impl From<ProfileArg> for TimingProfile {
    fn from(profile: ProfileArg) -> Self {
        match profile {
            ProfileArg::Normal => TimingProfile::Normal,
            ProfileArg::Turbo => TimingProfile::Turbo,
            ProfileArg::Instant => TimingProfile::Instant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            spins,
            seed,
            config,
            json,
        } => run_simulate(&load_config(config.as_deref())?, spins, seed, json),
        Commands::Frequencies { draws, seed, config } => {
            run_frequencies(&load_config(config.as_deref())?, draws, seed)
        }
        Commands::Play {
            wager,
            spins,
            seed,
            profile,
            realtime,
            pool,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(balance) = pool {
                if !balance.is_finite() || balance < 0.0 {
                    bail!("Pool balance must be a non-negative number, got {}", balance);
                }
                config.initial_pool = balance;
            }
            if let Some(profile) = profile {
                config.timing = TimingConfig::from_profile(profile.into());
            }
            run_play(config, wager, spins, seed, realtime)
        }
        Commands::Config { format } => print_config(format),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Per-tier generator; tiers never share a stream
fn tier_rng(seed: Option<u64>, wager: u64) -> RngSource<ChaCha8Rng> {
    let rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s ^ wager.rotate_left(17)),
        None => ChaCha8Rng::from_os_rng(),
    };
    RngSource::new(rng)
}

#[derive(Serialize)]
struct SimulationOutput {
    spins_per_tier: u64,
    seed: Option<u64>,
    tiers: Vec<SimulationReport>,
}

fn run_simulate(config: &EngineConfig, spins: u64, seed: Option<u64>, json: bool) -> Result<()> {
    log::info!(
        "[rp-sim] simulating {} spins for {} wager tiers",
        spins,
        config.draw.wager_tiers.len()
    );

    let tiers: Vec<SimulationReport> = config
        .draw
        .wager_tiers
        .par_iter()
        .map(|tier| simulate(&mut tier_rng(seed, tier.amount), config, tier.amount, spins))
        .collect();

    if json {
        let output = SimulationOutput {
            spins_per_tier: spins,
            seed,
            tiers,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("🎰 Win rates over {} spins per tier\n", spins);
    print!("{:>9} {:>6} {:>8}", "wager", "mult", "win %");
    for tier in PrizeTier::ALL.iter().filter(|t| t.is_win()) {
        print!(" {:>13}", tier.as_str());
    }
    println!(" {:>7} {:>7} {:>7}", "5-match", "4-match", "3-match");

    for report in &tiers {
        print!(
            "{:>9} {:>6.2} {:>8.3}",
            report.wager,
            config.draw.multiplier_for(report.wager),
            report.win_rate
        );
        for tier in PrizeTier::ALL.iter().filter(|t| t.is_win()) {
            print!(" {:>13}", report.count(*tier));
        }
        println!(
            " {:>7} {:>7} {:>7}",
            report.five_match, report.four_match, report.three_match
        );
    }
    Ok(())
}

fn run_frequencies(config: &EngineConfig, draws: u64, seed: Option<u64>) -> Result<()> {
    let rows: Vec<(u64, Vec<(Symbol, f64)>)> = config
        .draw
        .wager_tiers
        .par_iter()
        .map(|tier| {
            let counts = symbol_frequencies(&mut tier_rng(seed, tier.amount), config, tier.amount, draws);
            (tier.amount, frequency_percents(&counts))
        })
        .collect();

    println!("📊 Symbol shares over {} draws per tier (observed / expected %)\n", draws);
    for (wager, shares) in rows {
        let expected = config.draw.weights_for_wager(wager);
        println!("wager {}", wager);
        for (symbol, share) in shares {
            println!(
                "  {} {:<8} {:>6.2} / {:>6.2}",
                symbol.emoji(),
                symbol.name(),
                share,
                expected.percent(symbol)
            );
        }
    }
    Ok(())
}

/// Prints every spin event as it happens
struct ConsoleObserver;

impl SpinObserver for ConsoleObserver {
    fn on_spin_start(&mut self, spin_id: &str, wager: u64) {
        println!("▶ {} wager {}", spin_id, wager);
    }

    fn on_reel_stop(&mut self, reel_index: usize, column: &Column) {
        let symbols: Vec<&str> = column.iter().map(|s| s.emoji()).collect();
        println!("  reel {} ▸ {}", reel_index, symbols.join(" "));
    }

    fn on_spin_end(&mut self, result: &SpinResult) {
        let name = result
            .prize_info
            .as_ref()
            .map(|p| format!("{} {}", p.emoji, p.name))
            .unwrap_or_else(|| "no win".to_string());
        println!(
            "■ {} {} | paid {:.4} | pool {:.4}\n",
            result.spin_id, name, result.pool_payout, result.pool_balance_after
        );
    }
}

fn run_play(config: EngineConfig, wager: u64, spins: u64, seed: Option<u64>, realtime: bool) -> Result<()> {
    let pool = Arc::new(PrizePool::new(config.initial_pool));
    let rng = tier_rng(seed, wager);
    let mut machine = SlotMachine::with_pool(Arc::new(config), Arc::clone(&pool), rng);
    machine.add_observer(Box::new(ConsoleObserver));

    for _ in 0..spins {
        if realtime {
            machine.begin_spin(wager)?;
            while let Some(wait_ms) = machine.next_event_in() {
                std::thread::sleep(Duration::from_secs_f64(wait_ms / 1000.0));
                if machine.advance(wait_ms)?.is_some() {
                    break;
                }
            }
        } else {
            machine.spin(wager)?;
        }
    }

    let session = machine.session();
    println!(
        "Session: {} spins, {} wins ({:.1}%), max combo {}, jackpots {}, paid {:.4}, pool {:.4}",
        session.total_spins,
        session.total_wins,
        session.hit_rate(),
        session.max_combo,
        session.jackpots,
        session.total_payout,
        pool.balance()
    );
    Ok(())
}

fn print_config(format: Format) -> Result<()> {
    let config = EngineConfig::default();
    let text = match format {
        Format::Yaml => config.to_yaml_string()?,
        Format::Json => config.to_json_string()?,
    };
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rp_engine::RandomSource;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_play_args() {
        let cli = Cli::parse_from(["rp-sim", "play", "--wager", "50000", "--profile", "turbo", "--pool", "3.5"]);
        match cli.command {
            Commands::Play {
                wager, profile, pool, ..
            } => {
                assert_eq!(wager, 50_000);
                assert_eq!(profile, Some(ProfileArg::Turbo));
                assert_eq!(pool, Some(3.5));
            }
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_tier_rngs_differ_but_repeat() {
        let mut a = tier_rng(Some(1), 10_000);
        let mut b = tier_rng(Some(1), 25_000);
        let mut a2 = tier_rng(Some(1), 10_000);
        let x = a.next_uniform();
        assert_ne!(x, b.next_uniform());
        assert_eq!(x, a2.next_uniform());
    }
}
