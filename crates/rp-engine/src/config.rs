//! Engine configuration
//!
//! All static tables in one serde-loadable struct. `Default` is the
//! production table; YAML or JSON files may override any section.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draw::{CommonSplit, DrawTable, PROBABILITY_SPACE};
use crate::error::ConfigError;
use crate::payline::{Payline, paylines};
use crate::pool::PoolProtection;
use crate::prize::{PrizeTable, PrizeTier};
use crate::symbols::{SYMBOLS, Symbol, SymbolInfo};
use crate::timing::TimingConfig;

/// Starting pool balance for a fresh session
pub const DEFAULT_INITIAL_POOL: f64 = 10.5;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Symbol weighting and wager tiers
    pub draw: DrawTable,
    /// Prize tier table
    pub prizes: PrizeTable,
    /// Payout safety limits
    pub pool_protection: PoolProtection,
    /// Pool balance for a new session
    pub initial_pool: f64,
    /// Reel-stop timing
    pub timing: TimingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            draw: DrawTable::default(),
            prizes: PrizeTable::standard(),
            pool_protection: PoolProtection::default(),
            initial_pool: DEFAULT_INITIAL_POOL,
            timing: TimingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::debug!("[EngineConfig] loaded {}", path.display());
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yml::to_string(self).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Symbol table export
    pub fn symbols(&self) -> &'static [SymbolInfo] {
        &SYMBOLS
    }

    /// Payline export
    pub fn paylines(&self) -> Vec<Payline> {
        paylines()
    }

    /// Check every table for values the engine cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_draw()?;
        self.validate_prizes()?;
        self.validate_pool()?;
        self.validate_timing()
    }

    fn validate_draw(&self) -> Result<(), ConfigError> {
        let draw = &self.draw;

        for symbol in Symbol::PREMIUM {
            let count = draw.premium.iter().filter(|w| w.symbol == symbol).count();
            if count != 1 {
                return Err(invalid(format!("premium symbol {} must appear exactly once, found {}", symbol, count)));
            }
        }
        if draw.premium.len() != Symbol::PREMIUM.len() {
            return Err(invalid("premium weights may only name seven, diamond, crown, bell and star"));
        }

        for w in &draw.premium {
            if ![w.base, w.slope, w.ceiling].iter().all(|v| v.is_finite() && *v >= 0.0) {
                return Err(invalid(format!("{} weight values must be finite and non-negative", w.symbol)));
            }
            if w.base > w.ceiling {
                return Err(invalid(format!("{} base {} exceeds its ceiling {}", w.symbol, w.base, w.ceiling)));
            }
        }

        let ceilings: f64 = draw.premium.iter().map(|w| w.ceiling).sum();
        if ceilings > PROBABILITY_SPACE {
            return Err(invalid(format!("premium ceilings sum to {} (max {})", ceilings, PROBABILITY_SPACE)));
        }

        if let CommonSplit::Proportional { shares } = &draw.common_split {
            if !shares.iter().all(|s| s.is_finite() && *s >= 0.0) {
                return Err(invalid("common split shares must be finite and non-negative"));
            }
            let total: f64 = shares.iter().sum();
            if (total - 1.0).abs() > 1e-9 {
                return Err(invalid(format!("common split shares sum to {}, expected 1", total)));
            }
        }

        for (i, tier) in draw.wager_tiers.iter().enumerate() {
            if !tier.multiplier.is_finite() || tier.multiplier <= 0.0 {
                return Err(invalid(format!("wager {} has invalid multiplier {}", tier.amount, tier.multiplier)));
            }
            if draw.wager_tiers[..i].iter().any(|t| t.amount == tier.amount) {
                return Err(invalid(format!("wager {} listed twice", tier.amount)));
            }
        }

        Ok(())
    }

    fn validate_prizes(&self) -> Result<(), ConfigError> {
        for (i, prize) in self.prizes.iter().enumerate() {
            if prize.tier == PrizeTier::None {
                return Err(invalid("the none tier cannot carry a prize entry"));
            }
            if !(0.0..=1.0).contains(&prize.pool_percent) {
                return Err(invalid(format!("{} pool percent {} outside [0, 1]", prize.tier, prize.pool_percent)));
            }
            if self.prizes.0[..i].iter().any(|p| p.tier == prize.tier) {
                return Err(invalid(format!("{} listed twice", prize.tier)));
            }
        }
        Ok(())
    }

    fn validate_pool(&self) -> Result<(), ConfigError> {
        let p = &self.pool_protection;
        if !(0.0..=1.0).contains(&p.max_single_payout) {
            return Err(invalid(format!("max single payout {} outside [0, 1]", p.max_single_payout)));
        }
        if !(0.0..1.0).contains(&p.reserve_percent) {
            return Err(invalid(format!("reserve percent {} outside [0, 1)", p.reserve_percent)));
        }
        if !self.initial_pool.is_finite() || self.initial_pool < 0.0 {
            return Err(invalid(format!("initial pool {} must be finite and non-negative", self.initial_pool)));
        }
        Ok(())
    }

    fn validate_timing(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        let values = [t.first_stop_ms, t.reel_stop_interval_ms, t.brake_lead_ms, t.settle_delay_ms];
        if !values.iter().all(|v| v.is_finite() && *v >= 0.0) {
            return Err(invalid("timing values must be finite and non-negative"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
