//! Prize tiers and classification

use serde::{Deserialize, Serialize};

use crate::payline::WinLine;
use crate::symbols::{Rarity, Symbol};

/// Prize tier, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeTier {
    /// Five sevens
    SuperJackpot,
    /// Five diamonds or four sevens
    Jackpot,
    /// Five of any symbol
    First,
    /// Four legendary or epic symbols
    Second,
    /// Four of any other symbol
    Third,
    /// Three of a kind
    Small,
    /// Two of a kind (table entry only, never awarded by the single-line evaluator)
    Consolation,
    None,
}

impl PrizeTier {
    /// Every tier, highest first
    pub const ALL: [PrizeTier; 8] = [
        PrizeTier::SuperJackpot,
        PrizeTier::Jackpot,
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Small,
        PrizeTier::Consolation,
        PrizeTier::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeTier::SuperJackpot => "super_jackpot",
            PrizeTier::Jackpot => "jackpot",
            PrizeTier::First => "first",
            PrizeTier::Second => "second",
            PrizeTier::Third => "third",
            PrizeTier::Small => "small",
            PrizeTier::Consolation => "consolation",
            PrizeTier::None => "none",
        }
    }

    pub fn is_jackpot(&self) -> bool {
        matches!(self, PrizeTier::SuperJackpot | PrizeTier::Jackpot)
    }

    pub fn is_win(&self) -> bool {
        !matches!(self, PrizeTier::None)
    }
}

impl std::fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prize table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeInfo {
    pub tier: PrizeTier,
    pub name: String,
    pub emoji: String,
    pub description: String,
    /// Fraction of the available pool paid for this tier
    pub pool_percent: f64,
}

impl PrizeInfo {
    pub fn new(
        tier: PrizeTier,
        name: impl Into<String>,
        emoji: impl Into<String>,
        description: impl Into<String>,
        pool_percent: f64,
    ) -> Self {
        Self {
            tier,
            name: name.into(),
            emoji: emoji.into(),
            description: description.into(),
            pool_percent,
        }
    }
}

/// Prize tier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable(pub Vec<PrizeInfo>);

impl PrizeTable {
    pub fn standard() -> Self {
        Self(vec![
            PrizeInfo::new(PrizeTier::SuperJackpot, "Super Jackpot", "🎰", "5 × seven", 0.50),
            PrizeInfo::new(PrizeTier::Jackpot, "Jackpot", "💎", "5 × diamond or 4 × seven", 0.25),
            PrizeInfo::new(PrizeTier::First, "First Prize", "👑", "5 of a kind", 0.13),
            PrizeInfo::new(PrizeTier::Second, "Second Prize", "🔔", "4 premium symbols", 0.05),
            PrizeInfo::new(PrizeTier::Third, "Third Prize", "⭐", "4 of a kind", 0.017),
            PrizeInfo::new(PrizeTier::Small, "Small Prize", "🍀", "3 of a kind", 0.005),
            PrizeInfo::new(PrizeTier::Consolation, "Consolation", "🎁", "2 of a kind", 0.001),
        ])
    }

    /// Entry for a tier; `None` has no entry
    pub fn get(&self, tier: PrizeTier) -> Option<&PrizeInfo> {
        self.0.iter().find(|p| p.tier == tier)
    }

    /// Pool fraction for a tier, 0 when absent
    pub fn pool_percent(&self, tier: PrizeTier) -> f64 {
        self.get(tier).map(|p| p.pool_percent).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrizeInfo> {
        self.0.iter()
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolve a spin's win lines to a single tier
///
/// Tiers overlap (five sevens also satisfy "five of a kind"), so the checks
/// run top-down and the first match wins.
pub fn classify(win_lines: &[WinLine]) -> PrizeTier {
    let any = |pred: fn(&WinLine) -> bool| win_lines.iter().any(pred);

    if win_lines.is_empty() {
        PrizeTier::None
    } else if any(|l| l.symbol == Symbol::Seven && l.count == 5) {
        PrizeTier::SuperJackpot
    } else if any(|l| {
        (l.symbol == Symbol::Diamond && l.count == 5) || (l.symbol == Symbol::Seven && l.count == 4)
    }) {
        PrizeTier::Jackpot
    } else if any(|l| l.count == 5) {
        PrizeTier::First
    } else if any(|l| l.count == 4 && matches!(l.symbol.rarity(), Rarity::Legendary | Rarity::Epic)) {
        PrizeTier::Second
    } else if any(|l| l.count == 4) {
        PrizeTier::Third
    } else {
        PrizeTier::Small
    }
}
