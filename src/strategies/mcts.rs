//! Light Monte-Carlo Tree Search: UCB1 selection, single-child expansion,
//! uniformly random rollout, visit-count backpropagation. Reseeded on every
//! `choose_best_move` call so repeated runs with the same seed and the same
//! `possible_actions` ordering are reproducible.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::SearchError;
use crate::interface::{Evaluator, Game, Player, Strategy};

struct MctsNode<S, A> {
    state: S,
    parent: Option<usize>,
    player_to_move: Player,
    untried: Vec<A>,
    children: Vec<(A, usize)>,
    visits: u32,
    wins: f64,
}

pub struct MonteCarlo<E: Evaluator> {
    eval: E,
    iterations: u32,
    seed: u64,
    exploration: f64,
    simulations: u64,
}

fn ucb1<S, A>(parent_visits: u32, child: &MctsNode<S, A>, exploration: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    let exploitation = child.wins / child.visits as f64;
    let bonus = exploration * ((parent_visits as f64).ln() / child.visits as f64).sqrt();
    exploitation + bonus
}

fn select<S, A>(arena: &[MctsNode<S, A>], root: usize, exploration: f64) -> usize {
    let mut current = root;
    loop {
        let node = &arena[current];
        if !node.untried.is_empty() || node.children.is_empty() {
            return current;
        }
        let parent_visits = node.visits;
        let mut best_idx = node.children[0].1;
        let mut best_score = f64::MIN;
        for (_, child_idx) in &node.children {
            let score = ucb1(parent_visits, &arena[*child_idx], exploration);
            if score > best_score {
                best_score = score;
                best_idx = *child_idx;
            }
        }
        current = best_idx;
    }
}

fn rollout<G: Game>(game: &G, state: &G::State, rng: &mut ChaCha8Rng) -> Option<Player> {
    let mut current = state.clone();
    let mut guard = 0usize;
    while !game.is_terminal(&current) {
        let actions = game.possible_actions(&current);
        if actions.is_empty() {
            break;
        }
        let action = actions.choose(rng).expect("non-empty action list");
        current = game.apply(&current, action);
        guard += 1;
        if guard > 10_000 {
            break;
        }
    }
    game.winner(&current)
}

fn backpropagate<S, A>(arena: &mut [MctsNode<S, A>], mut node: usize, winner: Option<Player>) {
    loop {
        let mover = arena[node].player_to_move.opponent();
        arena[node].visits += 1;
        let result = match winner {
            Some(w) if w == mover => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        };
        arena[node].wins += result;
        match arena[node].parent {
            Some(p) => node = p,
            None => break,
        }
    }
}

impl<E: Evaluator> MonteCarlo<E> {
    pub fn new(eval: E, iterations: u32, seed: u64) -> Result<Self, SearchError> {
        if iterations == 0 {
            return Err(SearchError::InvalidDepth(iterations as i64));
        }
        Ok(MonteCarlo { eval, iterations, seed, exploration: std::f64::consts::SQRT_2, simulations: 0 })
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn simulations(&self) -> u64 {
        self.simulations
    }

    pub fn set_iterations(&mut self, iterations: u32) {
        self.iterations = iterations.max(1);
    }
}

impl<E: Evaluator> Strategy<E::G> for MonteCarlo<E> {
    fn choose_best_move(&mut self, state: &<E::G as Game>::State) -> Option<<E::G as Game>::State> {
        self.simulations = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let exploration = self.exploration;
        let game = self.eval.game();

        if game.is_terminal(state) {
            return None;
        }
        let root_actions = game.possible_actions(state);
        if root_actions.is_empty() {
            return None;
        }

        let mut arena: Vec<MctsNode<<E::G as Game>::State, <E::G as Game>::Action>> = Vec::new();
        arena.push(MctsNode {
            state: state.clone(),
            parent: None,
            player_to_move: game.player_to_move(state),
            untried: root_actions,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        });
        let root = 0usize;
        let mut simulations = 0u64;

        for _ in 0..self.iterations {
            simulations += 1;
            let mut leaf = select(&arena, root, exploration);

            if game.is_terminal(&arena[leaf].state) {
                let winner = game.winner(&arena[leaf].state);
                backpropagate(&mut arena, leaf, winner);
                continue;
            }

            if !arena[leaf].untried.is_empty() {
                let idx_in_untried = rng.gen_range(0..arena[leaf].untried.len());
                let action = arena[leaf].untried.remove(idx_in_untried);
                let child_state = game.apply(&arena[leaf].state, &action);
                let child_player = game.player_to_move(&child_state);
                let child_untried = if game.is_terminal(&child_state) {
                    Vec::new()
                } else {
                    game.possible_actions(&child_state)
                };
                let child_idx = arena.len();
                arena.push(MctsNode {
                    state: child_state,
                    parent: Some(leaf),
                    player_to_move: child_player,
                    untried: child_untried,
                    children: Vec::new(),
                    visits: 0,
                    wins: 0.0,
                });
                arena[leaf].children.push((action, child_idx));
                leaf = child_idx;
            }

            let winner = rollout(game, &arena[leaf].state, &mut rng);
            backpropagate(&mut arena, leaf, winner);
        }

        self.simulations = simulations;
        let root_node = &arena[root];
        let best = root_node
            .children
            .iter()
            .max_by_key(|(_, idx)| arena[*idx].visits)
            .map(|(action, _)| *action);

        debug!("mcts move chosen: simulations={} children={}", simulations, root_node.children.len());
        best.map(|action| game.apply(state, &action))
    }
}
