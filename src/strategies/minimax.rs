//! Plain fixed-depth Minimax: the reference algorithm every other strategy
//! is checked against (see the equivalence property in the crate's test
//! suite).

use log::{debug, trace};

use crate::error::SearchError;
use crate::interface::{Evaluation, Evaluator, Game, Player, Strategy};

pub struct Minimax<E: Evaluator> {
    eval: E,
    max_depth: u32,
    nodes_explored: u64,
}

impl<E: Evaluator> Minimax<E> {
    pub fn new(eval: E, max_depth: u32) -> Result<Self, SearchError> {
        if max_depth == 0 {
            return Err(SearchError::InvalidDepth(max_depth as i64));
        }
        Ok(Minimax { eval, max_depth, nodes_explored: 0 })
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth.max(1);
    }

    fn value(&mut self, state: &<E::G as Game>::State, depth: u32) -> Evaluation {
        self.nodes_explored += 1;
        let game = self.eval.game();
        trace!("minimax visit: depth={} node={}", depth, self.nodes_explored);

        if game.is_terminal(state) {
            return game.utility(state);
        }
        if depth == 0 {
            return self.eval.evaluate(state);
        }

        let player = game.player_to_move(state);
        let actions = game.possible_actions(state);
        if actions.is_empty() {
            return self.eval.evaluate(state);
        }

        match player {
            Player::Max => {
                let mut best = Evaluation::MIN;
                for action in &actions {
                    let child = self.eval.game().apply(state, action);
                    let v = self.value(&child, depth - 1);
                    best = best.max(v);
                }
                best
            }
            Player::Min => {
                let mut best = Evaluation::MAX;
                for action in &actions {
                    let child = self.eval.game().apply(state, action);
                    let v = self.value(&child, depth - 1);
                    best = best.min(v);
                }
                best
            }
        }
    }
}

impl<E: Evaluator> Strategy<E::G> for Minimax<E> {
    fn choose_best_move(&mut self, state: &<E::G as Game>::State) -> Option<<E::G as Game>::State> {
        self.nodes_explored = 0;
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
            let child = self.eval.game().apply(state, action);
            let v = self.value(&child, max_depth - 1);
            let better = match player {
                Player::Max => best_child.is_none() || v > best_value,
                Player::Min => best_child.is_none() || v < best_value,
            };
            if better {
                best_value = v;
                best_child = Some(child);
            }
        }

        debug!(
            "minimax move chosen: nodes={} depth={} value={}",
            self.nodes_explored, max_depth, best_value
        );
        best_child
    }
}
