//! The capability contract a concrete game must implement to be searched by
//! this crate, plus the small set of types (`Player`, `Evaluation`) every
//! strategy is built around.
//!
//! A game never hands the engine a `Game` object embedded in its states;
//! instead a `Game` instance is held by the strategy that searches it and
//! threaded alongside the state through every call (see `Evaluator::game`).
//! This keeps `State` a plain value type that can be cloned, hashed, and
//! compared without dragging a back-reference to the rules along with it.

/// Signed evaluation of a position, from MAX's perspective: positive favors
/// MAX, negative favors MIN. Terminal utilities and heuristics share this
/// one integer type so there is never a float/int comparison to get wrong.
pub type Evaluation = i32;

/// Magnitude used for a won/lost terminal. Heuristics are expected to stay
/// well below this so that any forced win or loss outranks every
/// non-terminal evaluation.
pub const MAX_UTILITY: Evaluation = 1_000_000;

/// Heuristics returned by `Game::heuristic` should stay within this bound.
pub const HEURISTIC_BOUND: Evaluation = 100_000;

/// Sentinel "negative infinity" used to seed alpha-beta style searches.
/// Chosen with headroom beyond `MAX_UTILITY` so that negating it (as
/// Negamax does) never saturates `Evaluation`.
pub const WORST_EVAL: Evaluation = -2_000_000;

/// Sentinel "positive infinity", the mirror of [`WORST_EVAL`].
pub const BEST_EVAL: Evaluation = 2_000_000;

/// The two sides of a zero-sum, perfect-information game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Max,
    Min,
}

impl Player {
    /// The other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::Max => Player::Min,
            Player::Min => Player::Max,
        }
    }

    /// +1 for MAX, -1 for MIN. Useful for negamax-style sign flips.
    pub fn sign(self) -> Evaluation {
        match self {
            Player::Max => 1,
            Player::Min => -1,
        }
    }
}

/// Reported winner of a terminal state. `None` from [`Game::winner`] means
/// either the state isn't terminal or the game ended in a draw.
pub type Winner = Player;

/// The abstract contract a concrete game implements so the engine can
/// search it without knowing anything about its rules.
///
/// `State` is a pure value type: `apply` always returns a new state and
/// never mutates its input. `Action` is opaque to the engine beyond being
/// copyable and comparable.
pub trait Game {
    type State: Clone;
    type Action: Copy + Eq;

    /// The position the game starts from.
    fn initial_state(&self) -> Self::State;

    /// Legal actions from `state`, in the order the engine should try them
    /// by default (the baseline move ordering before any search-specific
    /// reordering is applied).
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by playing `action` from `state`. Never mutates
    /// `state`; the returned board must not alias any of `state`'s storage.
    fn apply(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Whether `state` ends the game.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Exact value of a terminal state, signed from MAX's perspective and
    /// bounded around [`MAX_UTILITY`]. Meaningless on non-terminal states.
    fn utility(&self, state: &Self::State) -> Evaluation;

    /// Cheap, non-terminal evaluation of `state`, bounded by
    /// [`HEURISTIC_BOUND`].
    fn heuristic(&self, state: &Self::State) -> Evaluation;

    /// The winner of a terminal state, or `None` for a draw / ongoing game.
    fn winner(&self, state: &Self::State) -> Option<Player>;

    /// Which side moves first from `initial_state`.
    fn max_starts(&self) -> bool;

    /// Whose turn it is to move at `state`.
    fn player_to_move(&self, state: &Self::State) -> Player;

    /// The subset of `possible_actions` considered "noisy" (tactical,
    /// e.g. captures) for quiescence search. Defaults to empty, in which
    /// case quiescence search degenerates to a stand-pat evaluation -
    /// most games never need to override this.
    fn generate_noisy_actions(&self, _state: &Self::State) -> Vec<Self::Action> {
        Vec::new()
    }

    /// Optional move-ordering hint: games with a natural center bias
    /// (e.g. Connect-4's middle column) can return a larger score for
    /// more central actions. Defaults to no bias.
    fn center_bias(&self, _action: &Self::Action) -> i32 {
        0
    }
}

/// Separates "what is this position worth" from "what are the rules",
/// mirroring the way the game's own heuristic can be swapped out for a
/// smarter evaluation without touching move generation or legality.
///
/// Every strategy is generic over an `Evaluator` rather than a bare
/// `Game`; `evaluator.game()` is how a strategy reaches the rules it
/// needs (`possible_actions`, `apply`, `is_terminal`, ...).
pub trait Evaluator {
    type G: Game;

    /// Non-terminal evaluation used at the search horizon. Implementations
    /// that don't need a custom evaluation can simply forward to
    /// `self.game().heuristic(state)`.
    fn evaluate(&self, state: &<Self::G as Game>::State) -> Evaluation;

    /// The game whose rules this evaluator is paired with.
    fn game(&self) -> &Self::G;
}

/// An `Evaluator` that just forwards to the game's own heuristic - the
/// default wiring for callers that don't need a custom evaluation
/// function.
#[derive(Clone)]
pub struct GameEvaluator<G>(pub G);

impl<G: Game> Evaluator for GameEvaluator<G> {
    type G = G;

    fn evaluate(&self, state: &G::State) -> Evaluation {
        self.0.heuristic(state)
    }

    fn game(&self) -> &G {
        &self.0
    }
}

/// A state that can produce a 64-bit Zobrist hash of itself, used as the
/// transposition-table key by every strategy that caches. Game adapters
/// build this on top of the [`crate::zobrist::ZobristTable`] helper.
pub trait Zobrist {
    fn zobrist_hash(&self) -> u64;
}

/// Common entry point implemented by every search strategy (and by
/// [`crate::auto_solver::AutoSolver`], which dispatches to one of them).
pub trait Strategy<G: Game> {
    /// Choose a move for the side to play at `state`, returning the
    /// resulting successor state. `None` means the root has no legal
    /// moves (including: `state` is already terminal).
    fn choose_best_move(&mut self, state: &G::State) -> Option<G::State>;
}
