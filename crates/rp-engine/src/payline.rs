//! Payline definition and line evaluation

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, MIDDLE_ROW, REELS};
use crate::symbols::Symbol;

/// Shortest prefix run that pays
pub const MIN_MATCH: u8 = 3;

/// A payline: one row index per reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row positions for each reel
    pub rows: [u8; REELS],
}

impl Payline {
    /// Same row across all reels
    pub const fn straight(index: u8, row: u8) -> Self {
        Self {
            index,
            rows: [row; REELS],
        }
    }

    /// The grid cells this line covers, reel 0 first
    pub fn positions(&self) -> [(u8, u8); REELS] {
        std::array::from_fn(|reel| (reel as u8, self.rows[reel]))
    }
}

/// The only active payline: the middle row
pub const MIDDLE_LINE: Payline = Payline::straight(0, MIDDLE_ROW as u8);

/// Active payline set
pub fn paylines() -> Vec<Payline> {
    vec![MIDDLE_LINE]
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    /// Payline index
    pub line_index: u8,
    /// Matched symbol
    pub symbol: Symbol,
    /// Prefix run length (3..=5)
    pub count: u8,
    /// Matched cells (reel, row)
    pub positions: Vec<(u8, u8)>,
}

impl WinLine {
    pub fn new(line_index: u8, symbol: Symbol, count: u8) -> Self {
        Self {
            line_index,
            symbol,
            count,
            positions: (0..count).map(|reel| (reel, MIDDLE_ROW as u8)).collect(),
        }
    }
}

/// Evaluate one payline
///
/// Only the run starting at reel 0 counts. A longer run further right does
/// not pay.
pub fn evaluate_line(grid: &Grid, payline: &Payline) -> Option<WinLine> {
    let positions = payline.positions();
    let symbols: Vec<Symbol> = positions
        .iter()
        .map(|&(reel, row)| grid.symbol_at(reel as usize, row as usize))
        .collect::<Option<_>>()?;

    let first = *symbols.first()?;
    let count = symbols.iter().take_while(|&&s| s == first).count() as u8;

    if count < MIN_MATCH {
        return None;
    }

    Some(WinLine {
        line_index: payline.index,
        symbol: first,
        count,
        positions: positions[..count as usize].to_vec(),
    })
}

/// Evaluate every payline, keeping the wins
pub fn evaluate(grid: &Grid, paylines: &[Payline]) -> Vec<WinLine> {
    paylines
        .iter()
        .filter_map(|line| evaluate_line(grid, line))
        .collect()
}
