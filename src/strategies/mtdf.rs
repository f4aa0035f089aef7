//! MTD(f) with iterative deepening: converges to the minimax value through
//! successive null-window Alpha-Beta probes, reusing a transposition table
//! that persists across depths within a single `choose_best_move` call.

use instant::Duration;
use log::{debug, trace};

use crate::error::SearchError;
use crate::interface::{Evaluation, Evaluator, Game, Player, Strategy, Zobrist, WORST_EVAL, BEST_EVAL};
use crate::killer::KillerTable;
use crate::table::TranspositionTable;
use crate::util::{order_actions, Deadline};

pub struct Mtdf<E: Evaluator>
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
    iterations: u64,
}

impl<E: Evaluator> Mtdf<E>
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
        Ok(Mtdf {
            eval,
            max_depth,
            max_time,
            table: TranspositionTable::new(),
            killers: KillerTable::new(),
            nodes_explored: 0,
            cutoffs: 0,
            tt_hits: 0,
            iterations: 0,
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

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth.max(1);
    }

    pub fn set_max_time(&mut self, max_time: Option<Duration>) {
        self.max_time = max_time;
    }

    /// The bound-aware Alpha-Beta core MTD(f) repeatedly probes with a
    /// (near-)null window.
    fn alpha_beta_tt(
        &mut self,
        state: &<E::G as Game>::State,
        depth: u32,
        alpha: Evaluation,
        beta: Evaluation,
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
        let (mut alpha, beta, immediate) = self.table.probe_tightening(key, depth, alpha, beta);
        if let Some(v) = immediate {
            self.tt_hits += 1;
            return v;
        }
        let original_alpha = alpha;
        let original_beta = beta;

        let player = game.player_to_move(state);
        let mut actions = game.possible_actions(state);
        if actions.is_empty() {
            return self.eval.evaluate(state);
        }
        order_actions(game, &mut actions, &self.table, key, &self.killers, depth);

        let mut best_value = match player {
            Player::Max => Evaluation::MIN,
            Player::Min => Evaluation::MAX,
        };
        let mut best_action = None;
        let mut beta_local = beta;

        for action in &actions {
            let child = self.eval.game().apply(state, action);
            let v = self.alpha_beta_tt(&child, depth - 1, alpha, beta_local, deadline);

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
                    beta_local = beta_local.min(best_value);
                }
            }

            if alpha >= beta_local {
                self.cutoffs += 1;
                self.killers.push(depth, *action);
                break;
            }
        }

        if !deadline.expired() {
            self.table.clear_if_over_cap();
            self.table.store(key, depth, original_alpha, original_beta, best_value, best_action);
        }

        best_value
    }

    /// One MTD(f) convergence loop at a fixed depth, starting the bisection
    /// from first-guess `f`.
    fn mtdf_at_depth(
        &mut self,
        state: &<E::G as Game>::State,
        depth: u32,
        f: Evaluation,
        deadline: &Deadline,
    ) -> Evaluation {
        let mut g = f;
        let mut lower = WORST_EVAL;
        let mut upper = BEST_EVAL;

        while lower < upper && !deadline.expired() {
            let beta = if g == lower { g + 1 } else { g };
            g = self.alpha_beta_tt(state, depth, beta - 1, beta, deadline);
            if g < beta {
                upper = g;
            } else {
                lower = g;
            }
        }
        g
    }
}

impl<E: Evaluator> Strategy<E::G> for Mtdf<E>
where
    <E::G as Game>::State: Zobrist,
{
    fn choose_best_move(&mut self, state: &<E::G as Game>::State) -> Option<<E::G as Game>::State> {
        self.nodes_explored = 0;
        self.cutoffs = 0;
        self.tt_hits = 0;
        self.iterations = 0;
        let deadline = Deadline::new(self.max_time);

        let game = self.eval.game();
        if game.is_terminal(state) {
            return None;
        }
        let actions = game.possible_actions(state);
        if actions.is_empty() {
            return None;
        }

        let center_action = actions
            .iter()
            .copied()
            .max_by_key(|a| game.center_bias(a))
            .unwrap_or(actions[0]);
        let mut best_action = center_action;
        let mut f = 0;

        for depth in 1..=self.max_depth {
            if deadline.expired() {
                break;
            }
            self.iterations += 1;
            f = self.mtdf_at_depth(state, depth, f, &deadline);

            let key = state.zobrist_hash();
            if let Some(action) = self.table.best_action(key) {
                best_action = action;
            }
            trace!("mtdf depth={} value={} iterations={}", depth, f, self.iterations);
        }

        let game = self.eval.game();
        debug!(
            "mtdf move chosen: nodes={} tt_size={} depth_reached={} value={}",
            self.nodes_explored,
            self.table.len(),
            self.iterations,
            f
        );
        Some(game.apply(state, &best_action))
    }
}
