//! Dispatches to one of the six search strategies per move, based on
//! game-phase heuristics, and records telemetry for each decision.

use std::collections::HashMap;

use instant::Duration;
use log::info;

use crate::error::SearchError;
use crate::interface::{Evaluator, Game, Strategy, Zobrist};
use crate::strategies::alphabeta::AlphaBeta;
use crate::strategies::mcts::MonteCarlo;
use crate::strategies::minimax::Minimax;
use crate::strategies::mtdf::Mtdf;
use crate::strategies::negamax::Negamax;
use crate::strategies::pn_search::PnSearch;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Classic,
    Fast,
}

/// Caller-facing difficulty, mapped to a search depth.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        match d {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
            Difficulty::Expert => 9,
        }
    }
}

fn classic_timeout(depth: u8) -> f64 {
    match depth {
        3 => 0.5,
        5 => 1.0,
        7 => 2.0,
        9 => 3.0,
        _ => 1.0,
    }
}

fn fast_timeout(depth: u8) -> f64 {
    match depth {
        3 => 0.3,
        5 => 0.8,
        7 => 1.2,
        9 => 2.0,
        _ => 0.8,
    }
}

#[derive(Clone, Debug)]
pub struct AlgoRecord {
    pub move_number: u32,
    pub algorithm_name: &'static str,
    pub reason: String,
    pub elapsed: f64,
    pub stats: HashMap<&'static str, f64>,
}

pub struct AutoSolver<E: Evaluator>
where
    E: Clone,
    E::G: Clone,
    <E::G as Game>::State: Zobrist,
{
    eval: E,
    mode: Mode,
    depth: u8,
    rows: usize,
    cols: usize,
    moves_played: u32,
    history: Vec<AlgoRecord>,

    minimax: Option<Minimax<E>>,
    alphabeta: Option<AlphaBeta<E>>,
    mtdf: Option<Mtdf<E>>,
    negamax: Option<Negamax<E>>,
    mcts: Option<MonteCarlo<E>>,
    pn_search: Option<PnSearch<E::G>>,
}

enum Choice {
    Minimax(u32),
    AlphaBeta(Option<Duration>),
    Mtdf(u32, Option<Duration>),
    Negamax(Option<Duration>),
    Mcts(u32),
    PnSearch(u64),
}

impl<E: Evaluator> AutoSolver<E>
where
    E: Clone,
    E::G: Clone,
    <E::G as Game>::State: Zobrist,
{
    pub fn new(eval: E, mode: Mode, difficulty: Difficulty, rows: usize, cols: usize) -> Result<Self, SearchError> {
        let depth: u8 = difficulty.into();
        Ok(AutoSolver {
            eval,
            mode,
            depth,
            rows,
            cols,
            moves_played: 0,
            history: Vec::new(),
            minimax: None,
            alphabeta: None,
            mtdf: None,
            negamax: None,
            mcts: None,
            pn_search: None,
        })
    }

    pub fn history(&self) -> &[AlgoRecord] {
        &self.history
    }

    fn empty_cells(&self) -> u32 {
        (self.rows * self.cols) as u32 - self.moves_played.min((self.rows * self.cols) as u32)
    }

    fn fill_ratio(&self) -> f64 {
        self.moves_played as f64 / (self.rows * self.cols) as f64
    }

    fn dispatch_fast(&self, empty: u32) -> (Choice, &'static str, String) {
        if empty <= 10 {
            (Choice::PnSearch(30_000), "PN-Search", format!("fast mode: {empty} empty cells, prove the endgame"))
        } else {
            let depth = self.depth.min(5) as u32;
            let timeout = fast_timeout(self.depth);
            (
                Choice::Mtdf(depth, Some(Duration::from_secs_f64(timeout))),
                "MTD(f)",
                format!("fast mode: {empty} empty cells, depth capped at {depth}"),
            )
        }
    }

    fn dispatch_classic(&self, moves_played: u32, empty: u32, ratio: f64, legal: usize) -> (Choice, &'static str, String) {
        if moves_played == 0 {
            let depth = (self.depth as u32).min(4);
            return (Choice::Minimax(depth), "Minimax", "first move: reference full-width search".to_string());
        }
        if (1..=3).contains(&moves_played) {
            return (
                Choice::AlphaBeta(None),
                "Alpha-Beta+TT",
                format!("opening phase: move {moves_played}"),
            );
        }
        if (4..=5).contains(&moves_played) {
            let timeout = classic_timeout(self.depth);
            return (
                Choice::Mtdf(self.depth as u32, Some(Duration::from_secs_f64(timeout))),
                "MTD(f)",
                format!("early-middlegame: move {moves_played}"),
            );
        }
        if (6..=8).contains(&moves_played) {
            return (Choice::Negamax(None), "Negamax", format!("middlegame: move {moves_played}"));
        }
        if (9..=12).contains(&moves_played) {
            return (
                Choice::AlphaBeta(None),
                "Alpha-Beta+TT",
                format!("late middlegame: move {moves_played}"),
            );
        }
        if (13..=15).contains(&moves_played) {
            if legal >= 6 {
                return (
                    Choice::Mcts(2_000),
                    "MCTS",
                    format!("late phase with wide branching: move {moves_played}, {legal} legal moves"),
                );
            }
            return (
                Choice::AlphaBeta(None),
                "Alpha-Beta+TT",
                format!("late phase, narrow branching: move {moves_played}, {legal} legal moves"),
            );
        }
        if empty <= 8 {
            return (Choice::PnSearch(50_000), "PN-Search", format!("endgame: {empty} empty cells"));
        }
        if ratio > 0.7 || empty < 12 {
            return (
                Choice::AlphaBeta(None),
                "Alpha-Beta+TT",
                format!("board mostly full: fill_ratio={ratio:.2}, empty={empty}"),
            );
        }
        (
            Choice::AlphaBeta(None),
            "Alpha-Beta+TT",
            "fallback: no phase heuristic matched".to_string(),
        )
    }

    fn invoke(&mut self, choice: Choice, state: &<E::G as Game>::State) -> (Option<<E::G as Game>::State>, HashMap<&'static str, f64>) {
        match choice {
            Choice::Minimax(depth) => {
                let strat = self.minimax.get_or_insert_with(|| {
                    Minimax::new(self.eval.clone(), depth).expect("valid minimax depth")
                });
                strat.set_max_depth(depth);
                let result = strat.choose_best_move(state);
                let mut stats = HashMap::new();
                stats.insert("nodes_explored", strat.nodes_explored() as f64);
                (result, stats)
            }
            Choice::AlphaBeta(max_time) => {
                let depth = self.depth as u32;
                let strat = self.alphabeta.get_or_insert_with(|| {
                    AlphaBeta::new(self.eval.clone(), depth, max_time).expect("valid alpha-beta config")
                });
                strat.set_max_depth(depth);
                strat.set_max_time(max_time);
                let result = strat.choose_best_move(state);
                let mut stats = HashMap::new();
                stats.insert("nodes_explored", strat.nodes_explored() as f64);
                stats.insert("cutoffs", strat.cutoffs() as f64);
                stats.insert("tt_hits", strat.tt_hits() as f64);
                stats.insert("tt_size", strat.tt_size() as f64);
                let hit_rate = if strat.nodes_explored() > 0 {
                    strat.tt_hits() as f64 / strat.nodes_explored() as f64
                } else {
                    0.0
                };
                stats.insert("tt_hit_rate", hit_rate);
                (result, stats)
            }
            Choice::Mtdf(depth, max_time) => {
                let strat = self.mtdf.get_or_insert_with(|| {
                    Mtdf::new(self.eval.clone(), depth, max_time).expect("valid mtdf config")
                });
                strat.set_max_depth(depth);
                strat.set_max_time(max_time);
                let result = strat.choose_best_move(state);
                let mut stats = HashMap::new();
                stats.insert("nodes_explored", strat.nodes_explored() as f64);
                stats.insert("cutoffs", strat.cutoffs() as f64);
                stats.insert("tt_hits", strat.tt_hits() as f64);
                stats.insert("tt_size", strat.tt_size() as f64);
                stats.insert("iterations", strat.iterations() as f64);
                (result, stats)
            }
            Choice::Negamax(max_time) => {
                let depth = self.depth as u32;
                let strat = self.negamax.get_or_insert_with(|| {
                    Negamax::new(self.eval.clone(), depth, max_time).expect("valid negamax config")
                });
                strat.set_max_depth(depth);
                strat.set_max_time(max_time);
                let result = strat.choose_best_move(state);
                let mut stats = HashMap::new();
                stats.insert("nodes_explored", strat.nodes_explored() as f64);
                stats.insert("tt_hits", strat.tt_hits() as f64);
                stats.insert("tt_size", strat.tt_size() as f64);
                (result, stats)
            }
            Choice::Mcts(iterations) => {
                let strat = self.mcts.get_or_insert_with(|| {
                    MonteCarlo::new(self.eval.clone(), iterations, 0xA5A5_1234_u64).expect("valid mcts config")
                });
                strat.set_iterations(iterations);
                let result = strat.choose_best_move(state);
                let mut stats = HashMap::new();
                stats.insert("simulations", strat.simulations() as f64);
                (result, stats)
            }
            Choice::PnSearch(budget) => {
                let game = self.eval.game().clone();
                let strat = self
                    .pn_search
                    .get_or_insert_with(|| PnSearch::new(game, budget).expect("valid pn-search budget"));
                strat.set_node_budget(budget);
                let result = strat.choose_best_move(state);
                let mut stats = HashMap::new();
                stats.insert("nodes_explored", strat.nodes_created() as f64);
                stats.insert("tt_size", strat.tt_size() as f64);
                (result, stats)
            }
        }
    }
}

impl<E: Evaluator> Strategy<E::G> for AutoSolver<E>
where
    E: Clone,
    E::G: Clone,
    <E::G as Game>::State: Zobrist,
{
    fn choose_best_move(&mut self, state: &<E::G as Game>::State) -> Option<<E::G as Game>::State> {
        let game = self.eval.game();
        if game.is_terminal(state) {
            return None;
        }
        let legal = game.possible_actions(state).len();
        let empty = self.empty_cells();
        let ratio = self.fill_ratio();
        let moves_played = self.moves_played;

        let (choice, name, reason) = match self.mode {
            Mode::Fast => self.dispatch_fast(empty),
            Mode::Classic => self.dispatch_classic(moves_played, empty, ratio, legal),
        };

        let start = instant::Instant::now();
        let (result, stats) = self.invoke(choice, state);
        let elapsed = start.elapsed().as_secs_f64();

        let move_number = self.moves_played + 1;
        info!("move {move_number}: {name} chosen ({reason}), elapsed={elapsed:.4}s");
        self.history.push(AlgoRecord { move_number, algorithm_name: name, reason, elapsed, stats });
        self.moves_played += 1;

        result
    }
}
