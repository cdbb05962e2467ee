//! Reel grid and grid generation

use serde::{Deserialize, Serialize};

use crate::draw::DrawTable;
use crate::random::RandomSource;
use crate::symbols::Symbol;

/// Number of reels (columns)
pub const REELS: usize = 5;
/// Visible rows per reel
pub const ROWS: usize = 3;
/// Row evaluated for wins
pub const MIDDLE_ROW: usize = 1;

/// One reel's visible symbols, top to bottom
pub type Column = [Symbol; ROWS];

/// 5 × 3 symbol grid, reel-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    reels: [Column; REELS],
}

impl Grid {
    pub fn new(reels: [Column; REELS]) -> Self {
        Self { reels }
    }

    /// Grid filled with one symbol
    pub fn filled(symbol: Symbol) -> Self {
        Self::new([[symbol; ROWS]; REELS])
    }

    /// Grid whose middle row is `line`, other rows filled with `filler`
    pub fn with_middle_row(line: [Symbol; REELS], filler: Symbol) -> Self {
        let mut grid = Self::filled(filler);
        for (reel, symbol) in line.into_iter().enumerate() {
            grid.reels[reel][MIDDLE_ROW] = symbol;
        }
        grid
    }

    pub fn column(&self, reel: usize) -> Option<&Column> {
        self.reels.get(reel)
    }

    pub fn columns(&self) -> &[Column; REELS] {
        &self.reels
    }

    pub fn symbol_at(&self, reel: usize, row: usize) -> Option<Symbol> {
        self.reels.get(reel).and_then(|c| c.get(row)).copied()
    }

    /// Replace one reel's column
    pub fn set_column(&mut self, reel: usize, column: Column) {
        if let Some(slot) = self.reels.get_mut(reel) {
            *slot = column;
        }
    }

    /// Symbols on a row, reel 0 first
    pub fn row(&self, row: usize) -> Option<[Symbol; REELS]> {
        if row >= ROWS {
            return None;
        }
        Some(std::array::from_fn(|reel| self.reels[reel][row]))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::filled(Symbol::Clover)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..ROWS {
            let cells: Vec<&str> = self.reels.iter().map(|c| c[row].emoji()).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Draw one reel's column
pub fn draw_column<R: RandomSource + ?Sized>(rng: &mut R, table: &DrawTable, wager: u64) -> Column {
    let weights = table.weights_for_wager(wager);
    std::array::from_fn(|_| weights.draw(rng))
}

/// Fill a full grid, reel by reel, top row first
pub fn generate_grid<R: RandomSource + ?Sized>(rng: &mut R, table: &DrawTable, wager: u64) -> Grid {
    let weights = table.weights_for_wager(wager);
    let mut reels = [[Symbol::Clover; ROWS]; REELS];
    for column in reels.iter_mut() {
        for cell in column.iter_mut() {
            *cell = weights.draw(rng);
        }
    }
    Grid::new(reels)
}
