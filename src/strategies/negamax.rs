//! Negamax with quiescence search: exploits `max(a, b) = -min(-a, -b)` so a
//! single recursive function serves both players, each called with its
//! value negated and sign-flipped for the other side.

use std::collections::HashMap;

use instant::Duration;
use log::{debug, trace};

use crate::error::SearchError;
use crate::interface::{Evaluation, Evaluator, Game, Strategy, Zobrist};
use crate::util::Deadline;

/// Stand-pat margin below `alpha` past which quiescence gives up on
/// recovering via captures alone.
const QUIESCENCE_DELTA_MARGIN: Evaluation = 1_000;

struct SimpleEntry {
    depth: u32,
    value: Evaluation,
}

pub struct Negamax<E: Evaluator>
where
    <E::G as Game>::State: Zobrist,
{
    eval: E,
    max_depth: u32,
    max_time: Option<Duration>,
    table: HashMap<u64, SimpleEntry>,
    nodes_explored: u64,
    tt_hits: u64,
}

impl<E: Evaluator> Negamax<E>
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
        Ok(Negamax {
            eval,
            max_depth,
            max_time,
            table: HashMap::new(),
            nodes_explored: 0,
            tt_hits: 0,
        })
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
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

    fn quiescence(
        &mut self,
        state: &<E::G as Game>::State,
        mut alpha: Evaluation,
        beta: Evaluation,
        color: Evaluation,
        deadline: &Deadline,
    ) -> Evaluation {
        self.nodes_explored += 1;
        let game = self.eval.game();

        let stand_pat = color * self.eval.evaluate(state);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if stand_pat < alpha - QUIESCENCE_DELTA_MARGIN {
            return alpha;
        }

        let noisy = game.generate_noisy_actions(state);
        if noisy.is_empty() || deadline.expired() {
            return alpha.max(stand_pat).min(beta);
        }

        for action in &noisy {
            let child = self.eval.game().apply(state, action);
            let score = -self.quiescence(&child, -beta, -alpha, -color, deadline);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    fn negamax(
        &mut self,
        state: &<E::G as Game>::State,
        depth: u32,
        mut alpha: Evaluation,
        beta: Evaluation,
        color: Evaluation,
        deadline: &Deadline,
    ) -> Evaluation {
        self.nodes_explored += 1;
        let game = self.eval.game();

        if game.is_terminal(state) {
            let mut value = color * game.utility(state);
            if value > 0 {
                value += depth as Evaluation;
            } else if value < 0 {
                value -= depth as Evaluation;
            }
            return value;
        }
        if depth == 0 || deadline.expired() {
            return self.quiescence(state, alpha, beta, color, deadline);
        }

        let key = state.zobrist_hash();
        if let Some(entry) = self.table.get(&key) {
            if entry.depth >= depth {
                self.tt_hits += 1;
                return entry.value;
            }
        }

        let mut actions = game.possible_actions(state);
        if actions.is_empty() {
            return self.quiescence(state, alpha, beta, color, deadline);
        }
        actions.sort_by_key(|a| {
            let child = game.apply(state, a);
            -(color * self.eval.evaluate(&child))
        });

        let mut best_value = Evaluation::MIN;
        for action in &actions {
            let child = self.eval.game().apply(state, action);
            let v = -self.negamax(&child, depth - 1, -beta, -alpha, -color, deadline);
            best_value = best_value.max(v);
            alpha = alpha.max(best_value);
            if alpha >= beta {
                break;
            }
        }

        if !deadline.expired() {
            let should_store = match self.table.get(&key) {
                Some(existing) => existing.depth <= depth,
                None => true,
            };
            if should_store {
                self.table.insert(key, SimpleEntry { depth, value: best_value });
            }
        }

        best_value
    }
}

impl<E: Evaluator> Strategy<E::G> for Negamax<E>
where
    <E::G as Game>::State: Zobrist,
{
    fn choose_best_move(&mut self, state: &<E::G as Game>::State) -> Option<<E::G as Game>::State> {
        self.nodes_explored = 0;
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
        let color = game.player_to_move(state).sign();
        let max_depth = self.max_depth;

        let mut best_child = None;
        let mut best_value = Evaluation::MIN;

        for action in &actions {
            if deadline.expired() {
                break;
            }
            let child = self.eval.game().apply(state, action);
            let v = -self.negamax(
                &child,
                max_depth - 1,
                Evaluation::MIN + 1,
                Evaluation::MAX,
                -color,
                &deadline,
            );
            if best_child.is_none() || v > best_value {
                best_value = v;
                best_child = Some(child);
            }
        }

        trace!("negamax tt_hits={}", self.tt_hits);
        debug!(
            "negamax move chosen: nodes={} tt_size={} value={}",
            self.nodes_explored,
            self.table.len(),
            best_value
        );
        best_child
    }
}
