//! Small helpers shared across strategies: a polled wall-clock deadline and
//! the common TT-best / killer / center-bias move-ordering priority used by
//! MTD(f) and Negamax.

use instant::{Duration, Instant};

use crate::interface::Game;
use crate::killer::KillerTable;
use crate::table::TranspositionTable;

/// A wall-clock budget a search polls rather than being interrupted by.
/// Mirrors this crate's synchronous, single-threaded execution model: no
/// background timer thread, just a cheap `Instant::now()` check at safe
/// points (node expansion, iterative-deepening iteration boundaries).
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    max_time: Option<Duration>,
}

impl Deadline {
    pub fn new(max_time: Option<Duration>) -> Self {
        Deadline { start: Instant::now(), max_time }
    }

    pub fn unbounded() -> Self {
        Deadline { start: Instant::now(), max_time: None }
    }

    pub fn expired(&self) -> bool {
        match self.max_time {
            Some(limit) => self.start.elapsed() >= limit,
            None => false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Orders `actions` in place for a node at `depth` keyed by `tt_key`:
/// the transposition table's recorded best move first (priority 3), then
/// killer moves recorded at this depth (priority 2), everything else last
/// (priority 0), with ties broken by the game's center-bias hint.
pub fn order_actions<G: Game>(
    game: &G,
    actions: &mut [G::Action],
    tt: &TranspositionTable<G::Action>,
    tt_key: u64,
    killers: &KillerTable<G::Action>,
    depth: u32,
) {
    let tt_best = tt.best_action(tt_key);
    let depth_killers = killers.get(depth);

    let priority = |action: &G::Action| -> i32 {
        if Some(*action) == tt_best {
            return 3;
        }
        if depth_killers.contains(action) {
            return 2;
        }
        0
    };

    actions.sort_by(|a, b| {
        let pa = priority(a);
        let pb = priority(b);
        pb.cmp(&pa).then_with(|| game.center_bias(b).cmp(&game.center_bias(a)))
    });
}
