//! Generic adversarial game search.
//!
//! Implements six strategies for choosing a move in a two-player,
//! zero-sum, perfect-information game against an abstract [`interface::Game`]
//! capability contract: [`strategies::minimax::Minimax`],
//! [`strategies::alphabeta::AlphaBeta`] (with a persistent transposition
//! table), [`strategies::mtdf::Mtdf`] (iterative-deepening MTD(f)),
//! [`strategies::negamax::Negamax`] (with quiescence search),
//! [`strategies::mcts::MonteCarlo`] (light Monte-Carlo tree search), and
//! [`strategies::pn_search::PnSearch`] (Proof-Number Search). The
//! [`auto_solver::AutoSolver`] dispatches among them per move using
//! game-phase heuristics.
//!
//! A game implements [`interface::Game`] for its own state and action
//! types; this crate never encodes rules for any specific game. Search
//! strategies are generic over [`interface::Evaluator`], which pairs a
//! `Game` with an evaluation function - the default [`interface::GameEvaluator`]
//! simply forwards to the game's own heuristic.

pub mod auto_solver;
pub mod error;
pub mod interface;
pub mod killer;
pub mod strategies;
pub mod table;
pub mod util;
pub mod zobrist;

pub use error::SearchError;
pub use interface::{Evaluation, Evaluator, Game, GameEvaluator, Player, Strategy, Winner, Zobrist};
