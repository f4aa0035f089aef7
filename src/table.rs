//! Shared transposition table used by MTD(f) and, in its simpler
//! "strict" probing mode, Alpha-Beta. Keyed by [`crate::interface::Zobrist`]
//! hash rather than by state equality, so collisions are possible in
//! principle but never checked - the games this crate targets have boards
//! small enough that 64-bit collisions are not a practical concern.

use std::collections::HashMap;

/// Entries above this count are dropped wholesale the next time the table
/// would grow further, rather than evicted one at a time. Mirrors the
/// source this crate is modeled on, which clears its whole table once it
/// passes the same threshold instead of maintaining per-entry LRU state.
pub const DEFAULT_SOFT_CAP: usize = 500_000;

#[derive(Copy, Clone, Debug)]
pub struct TtEntry<M> {
    pub depth: u32,
    pub lower: i32,
    pub upper: i32,
    pub best_action: Option<M>,
}

pub struct TranspositionTable<M> {
    entries: HashMap<u64, TtEntry<M>>,
    soft_cap: usize,
}

impl<M: Copy> TranspositionTable<M> {
    pub fn new() -> Self {
        Self::with_soft_cap(DEFAULT_SOFT_CAP)
    }

    pub fn with_soft_cap(soft_cap: usize) -> Self {
        TranspositionTable { entries: HashMap::new(), soft_cap }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops every entry once the table has grown past its soft cap. Called
    /// before `store` so a single oversized table never blocks new writes.
    pub fn clear_if_over_cap(&mut self) {
        if self.entries.len() > self.soft_cap {
            self.entries.clear();
        }
    }

    pub fn get(&self, key: u64) -> Option<&TtEntry<M>> {
        self.entries.get(&key)
    }

    /// Alpha-Beta's probe: an exact cutoff if the stored window already
    /// covers the requested bounds, otherwise `None` - no partial
    /// tightening of `alpha`/`beta`.
    pub fn probe_strict(&self, key: u64, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.entries.get(&key)?;
        if entry.depth < depth {
            return None;
        }
        if entry.lower >= entry.upper {
            return Some(entry.lower);
        }
        if entry.lower >= beta {
            return Some(entry.lower);
        }
        if entry.upper <= alpha {
            return Some(entry.upper);
        }
        None
    }

    /// MTD(f)'s probe: tightens the caller's `(alpha, beta)` window using
    /// whatever bound is stored, returning the possibly-narrowed window
    /// plus an immediate value if the window has collapsed.
    pub fn probe_tightening(
        &self,
        key: u64,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, i32, Option<i32>) {
        if let Some(entry) = self.entries.get(&key) {
            if entry.depth >= depth {
                if entry.lower >= entry.upper {
                    return (alpha, beta, Some(entry.lower));
                }
                if entry.lower > alpha {
                    alpha = entry.lower;
                }
                if entry.upper < beta {
                    beta = entry.upper;
                }
                if alpha >= beta {
                    return (alpha, beta, Some(entry.lower));
                }
            }
        }
        (alpha, beta, None)
    }

    /// Best action recorded for `key`, regardless of depth - used purely
    /// for move ordering, so a shallower stale entry is still useful.
    pub fn best_action(&self, key: u64) -> Option<M> {
        self.entries.get(&key).and_then(|e| e.best_action)
    }

    /// Records a search result, classifying it as a lower or upper bound
    /// depending on where `value` fell relative to the window that was
    /// searched. Never overwrites a strictly deeper existing entry.
    pub fn store(
        &mut self,
        key: u64,
        depth: u32,
        alpha: i32,
        beta: i32,
        value: i32,
        best_action: Option<M>,
    ) {
        if let Some(existing) = self.entries.get(&key) {
            if existing.depth > depth {
                return;
            }
        }

        self.clear_if_over_cap();

        let (lower, upper) = if value <= alpha {
            (i32::MIN, value)
        } else if value >= beta {
            (value, i32::MAX)
        } else {
            (value, value)
        };

        self.entries.insert(key, TtEntry { depth, lower, upper, best_action });
    }
}

impl<M: Copy> Default for TranspositionTable<M> {
    fn default() -> Self {
        Self::new()
    }
}
