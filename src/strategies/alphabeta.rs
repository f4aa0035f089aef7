//! Alpha-Beta pruning over a persistent transposition table, keyed by
//! [`crate::interface::Zobrist`] hash. Unlike MTD(f)'s table probing, this
//! strategy only ever takes an immediate cutoff from the table; it never
//! tightens its window from a partial bound.

use instant::Duration;
use log::{debug, trace};

use crate::error::SearchError;
use crate::interface::{Evaluation, Evaluator, Game, Player, Strategy, Zobrist};
use crate::killer::KillerTable;
use crate::table::TranspositionTable;
use crate::util::{order_actions, Deadline};

pub struct AlphaBeta<E: Evaluator>
where
    <E::G as Game>::State: Zobrist,
{
    eval: E,
    max_depth: u32,
    max_time: Option<Duration>,
    table: TranspositionTable<<E::G as Game>::Action>,
    killers: KillerTable<<E::G as Game>::Action>,
    nodes_explored: u64,
    cutoffs: u64,
    tt_hits: u64,
}

impl<E: Evaluator> AlphaBeta<E>
where
    <E::G as Game>::State: Zobrist,
{
    pub fn new(eval: E, max_depth: u32, max_time: Option<Duration>) -> Result<Self, SearchError> {
        if max_depth == 0 {
            return Err(SearchError::InvalidDepth(max_depth as i64));
        }
        if let Some(t) = max_time {
            if t.as_secs_f64() <= 0.0 {
                return Err(SearchError::InvalidTimeout(t.as_secs_f64()));
            }
        }
        Ok(AlphaBeta {
            eval,
            max_depth,
            max_time,
            table: TranspositionTable::new(),
            killers: KillerTable::new(),
            nodes_explored: 0,
            cutoffs: 0,
            tt_hits: 0,
        })
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    pub fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    pub fn tt_hits(&self) -> u64 {
        self.tt_hits
    }

    pub fn tt_size(&self) -> usize {
        self.table.len()
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth.max(1);
    }

    pub fn set_max_time(&mut self, max_time: Option<Duration>) {
        self.max_time = max_time;
    }

    fn search(
        &mut self,
        state: &<E::G as Game>::State,
        depth: u32,
        mut alpha: Evaluation,
        mut beta: Evaluation,
        deadline: &Deadline,
    ) -> Evaluation {
        self.nodes_explored += 1;
        let game = self.eval.game();

        if game.is_terminal(state) {
            return game.utility(state);
        }
        if depth == 0 || deadline.expired() {
            return self.eval.evaluate(state);
        }

        let key = state.zobrist_hash();
        if let Some(v) = self.table.probe_strict(key, depth, alpha, beta) {
            self.tt_hits += 1;
            return v;
        }

        let player = game.player_to_move(state);
        let mut actions = game.possible_actions(state);
        if actions.is_empty() {
            return self.eval.evaluate(state);
        }
        order_actions(game, &mut actions, &self.table, key, &self.killers, depth);

        let original_alpha = alpha;
        let original_beta = beta;
        let mut best_value = match player {
            Player::Max => Evaluation::MIN,
            Player::Min => Evaluation::MAX,
        };
        let mut best_action = None;

        for action in &actions {
            let child = self.eval.game().apply(state, action);
            let v = self.search(&child, depth - 1, alpha, beta, deadline);

            match player {
                Player::Max => {
                    if v > best_value {
                        best_value = v;
                        best_action = Some(*action);
                    }
                    alpha = alpha.max(best_value);
                }
                Player::Min => {
                    if v < best_value {
                        best_value = v;
                        best_action = Some(*action);
                    }
                    beta = beta.min(best_value);
                }
            }

            if alpha >= beta {
                self.cutoffs += 1;
                self.killers.push(depth, *action);
                break;
            }
        }

        if !deadline.expired() {
            let should_store = match self.table.get(key) {
                Some(existing) => existing.depth <= depth,
                None => true,
            };
            if should_store {
                self.table.clear_if_over_cap();
                self.table.store(key, depth, original_alpha, original_beta, best_value, best_action);
            }
        }

        best_value
    }
}

impl<E: Evaluator> Strategy<E::G> for AlphaBeta<E>
where
    <E::G as Game>::State: Zobrist,
{
    fn choose_best_move(&mut self, state: &<E::G as Game>::State) -> Option<<E::G as Game>::State> {
        self.nodes_explored = 0;
        self.cutoffs = 0;
        self.tt_hits = 0;
        let deadline = Deadline::new(self.max_time);

        let game = self.eval.game();
        if game.is_terminal(state) {
            return None;
        }
        let actions = game.possible_actions(state);
        if actions.is_empty() {
            return None;
        }
        let player = game.player_to_move(state);
        let max_depth = self.max_depth;

        let mut best_child = None;
        let mut best_value = match player {
            Player::Max => Evaluation::MIN,
            Player::Min => Evaluation::MAX,
        };

        for action in &actions {
            if deadline.expired() {
                break;
            }
            let child = self.eval.game().apply(state, action);
            let v = self.search(&child, max_depth - 1, Evaluation::MIN, Evaluation::MAX, &deadline);
            let better = match player {
                Player::Max => best_child.is_none() || v > best_value,
                Player::Min => best_child.is_none() || v < best_value,
            };
            if better {
                best_value = v;
                best_child = Some(child);
            }
        }

        trace!("alpha-beta cutoffs={} tt_hits={}", self.cutoffs, self.tt_hits);
        debug!(
            "alpha-beta move chosen: nodes={} tt_size={} value={}",
            self.nodes_explored,
            self.table.len(),
            best_value
        );
        best_child
    }
}
