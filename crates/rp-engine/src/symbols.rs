//! Symbol definitions and rarity classes

use serde::{Deserialize, Serialize};

/// Number of playable symbols
pub const SYMBOL_COUNT: usize = 10;

/// Rarity classification, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Legendary,
    Epic,
    Rare,
    Common,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Legendary => "legendary",
            Rarity::Epic => "epic",
            Rarity::Rare => "rare",
            Rarity::Common => "common",
        }
    }
}

/// A playable symbol
///
/// Declaration order is the canonical index order (0 = seven ... 9 = clover),
/// which is also the order of the cumulative draw thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    Seven = 0,
    Diamond = 1,
    Crown = 2,
    Bell = 3,
    Star = 4,
    Cherry = 5,
    Lemon = 6,
    Orange = 7,
    Grape = 8,
    Clover = 9,
}

impl Symbol {
    /// All symbols in index order
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Seven,
        Symbol::Diamond,
        Symbol::Crown,
        Symbol::Bell,
        Symbol::Star,
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Grape,
        Symbol::Clover,
    ];

    /// The five rare-or-better symbols whose odds scale with the wager
    pub const PREMIUM: [Symbol; 5] = [
        Symbol::Seven,
        Symbol::Diamond,
        Symbol::Crown,
        Symbol::Bell,
        Symbol::Star,
    ];

    /// The five symbols sharing the remainder of the probability space
    pub const FILLER: [Symbol; 5] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Grape,
        Symbol::Clover,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Static display metadata
    pub fn info(self) -> &'static SymbolInfo {
        &SYMBOLS[self.index()]
    }

    pub fn rarity(self) -> Rarity {
        self.info().rarity
    }

    pub fn emoji(self) -> &'static str {
        self.info().emoji
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Seven or diamond
    pub fn is_legendary(self) -> bool {
        self.rarity() == Rarity::Legendary
    }

    pub fn id(self) -> &'static str {
        match self {
            Symbol::Seven => "seven",
            Symbol::Diamond => "diamond",
            Symbol::Crown => "crown",
            Symbol::Bell => "bell",
            Symbol::Star => "star",
            Symbol::Cherry => "cherry",
            Symbol::Lemon => "lemon",
            Symbol::Orange => "orange",
            Symbol::Grape => "grape",
            Symbol::Clover => "clover",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Display metadata for a symbol
#[derive(Debug, Clone, Serialize)]
pub struct SymbolInfo {
    pub symbol: Symbol,
    pub emoji: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
}

/// Symbol table, indexed by `Symbol::index()`
pub static SYMBOLS: [SymbolInfo; SYMBOL_COUNT] = [
    SymbolInfo { symbol: Symbol::Seven, emoji: "7️⃣", name: "Lucky Seven", rarity: Rarity::Legendary },
    SymbolInfo { symbol: Symbol::Diamond, emoji: "💎", name: "Diamond", rarity: Rarity::Legendary },
    SymbolInfo { symbol: Symbol::Crown, emoji: "👑", name: "Crown", rarity: Rarity::Epic },
    SymbolInfo { symbol: Symbol::Bell, emoji: "🔔", name: "Bell", rarity: Rarity::Epic },
    SymbolInfo { symbol: Symbol::Star, emoji: "⭐", name: "Star", rarity: Rarity::Epic },
    SymbolInfo { symbol: Symbol::Cherry, emoji: "🍒", name: "Cherry", rarity: Rarity::Rare },
    SymbolInfo { symbol: Symbol::Lemon, emoji: "🍋", name: "Lemon", rarity: Rarity::Rare },
    SymbolInfo { symbol: Symbol::Orange, emoji: "🍊", name: "Orange", rarity: Rarity::Rare },
    SymbolInfo { symbol: Symbol::Grape, emoji: "🍇", name: "Grape", rarity: Rarity::Common },
    SymbolInfo { symbol: Symbol::Clover, emoji: "🍀", name: "Clover", rarity: Rarity::Common },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_index_order() {
        for (i, info) in SYMBOLS.iter().enumerate() {
            assert_eq!(info.symbol.index(), i);
            assert_eq!(Symbol::from_index(i), Some(info.symbol));
        }
        assert_eq!(Symbol::from_index(SYMBOL_COUNT), None);
    }

    #[test]
    fn test_rarity_classes() {
        assert!(Symbol::Seven.is_legendary());
        assert!(Symbol::Diamond.is_legendary());
        assert_eq!(Symbol::Crown.rarity(), Rarity::Epic);
        assert_eq!(Symbol::Star.rarity(), Rarity::Epic);
        assert_eq!(Symbol::Lemon.rarity(), Rarity::Rare);
        assert_eq!(Symbol::Grape.rarity(), Rarity::Common);
        assert_eq!(Symbol::Clover.rarity(), Rarity::Common);
    }

    #[test]
    fn test_premium_and_filler_partition() {
        let mut all: Vec<Symbol> = Symbol::PREMIUM.iter().chain(Symbol::FILLER.iter()).copied().collect();
        all.sort();
        assert_eq!(all, Symbol::ALL.to_vec());
    }

    #[test]
    fn test_serde_ids() {
        let json = serde_json::to_string(&Symbol::Diamond).unwrap();
        assert_eq!(json, "\"diamond\"");
        let back: Symbol = serde_json::from_str("\"clover\"").unwrap();
        assert_eq!(back, Symbol::Clover);
    }
}
