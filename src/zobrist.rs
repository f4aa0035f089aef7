//! A reusable Zobrist key table: `Z[color][row][col]`, XORed together over
//! every occupied cell to produce a board hash. Game adapters build one of
//! these for their board dimensions and use it to implement
//! [`crate::interface::Zobrist`] on their state type; the engine itself
//! never inspects a board directly since board representation is
//! game-defined.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand::RngCore;

/// Fixed seed so that two `ZobristTable`s built for the same dimensions
/// always agree - required for the determinism guarantees in section 5 of
/// the design (repeated runs with the same inputs produce the same
/// outputs).
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x5EED_1234_ABCD_EF01;

#[derive(Clone, Debug)]
pub struct ZobristTable {
    // keys[color][row][col]
    keys: Vec<Vec<Vec<u64>>>,
    rows: usize,
    cols: usize,
}

impl ZobristTable {
    /// Builds a table for a `rows x cols` board with two piece colors,
    /// seeded deterministically so repeated constructions are identical.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_seed(rows, cols, DEFAULT_ZOBRIST_SEED)
    }

    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let keys = (0..2)
            .map(|_| {
                (0..rows)
                    .map(|_| (0..cols).map(|_| rng.next_u64()).collect())
                    .collect()
            })
            .collect();
        ZobristTable { keys, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The key for a single (color, row, col) cell. `color` is an
    /// arbitrary 0/1 index the caller assigns to each piece kind.
    pub fn key(&self, color: usize, row: usize, col: usize) -> u64 {
        self.keys[color][row][col]
    }

    /// Hashes a board by XORing the key of every occupied cell.
    pub fn hash_cells(&self, cells: impl Iterator<Item = (usize, usize, usize)>) -> u64 {
        cells.fold(0u64, |acc, (color, row, col)| acc ^ self.key(color, row, col))
    }
}
