//! Proof-Number Search: a binary-outcome oracle that tries to prove or
//! disprove "MAX wins" from a root state, rather than computing a scored
//! value. Operates over its own node type and arena (`PnNode`, a plain
//! `Vec`) because phi/delta bookkeeping has no counterpart in the
//! value-backed strategies.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::SearchError;
use crate::interface::{Game, Player, Strategy, Zobrist};

/// Saturating "infinity" for proof/disproof numbers. Kept well below
/// `u64::MAX` so two infinities can be summed without overflow.
const INFINITY: u64 = u64::MAX / 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProofStatus {
    Unknown,
    Proven,
    Disproven,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NodeKind {
    Or,
    And,
}

struct PnNode<S, A> {
    state: S,
    parent: Option<usize>,
    action_into: Option<A>,
    children: Vec<usize>,
    expanded: bool,
    phi: u64,
    delta: u64,
    status: ProofStatus,
    kind: NodeKind,
}

pub struct PnSearch<G: Game + Clone>
where
    G::State: Zobrist,
{
    game: G,
    node_budget: u64,
    nodes_created: u64,
    table: HashMap<u64, (u64, u64, ProofStatus)>,
    last_status: ProofStatus,
}

impl<G: Game + Clone> PnSearch<G>
where
    G::State: Zobrist,
{
    pub fn new(game: G, node_budget: u64) -> Result<Self, SearchError> {
        if node_budget == 0 {
            return Err(SearchError::InvalidDepth(node_budget as i64));
        }
        Ok(PnSearch { game, node_budget, nodes_created: 0, table: HashMap::new(), last_status: ProofStatus::Unknown })
    }

    pub fn nodes_created(&self) -> u64 {
        self.nodes_created
    }

    /// The root's proof status as of the most recent `choose_best_move`
    /// call - `Unknown` before the first call.
    pub fn last_status(&self) -> ProofStatus {
        self.last_status
    }

    pub fn tt_size(&self) -> usize {
        self.table.len()
    }

    pub fn set_node_budget(&mut self, node_budget: u64) {
        self.node_budget = node_budget.max(1);
    }

    fn node_kind(&self, state: &G::State) -> NodeKind {
        match self.game.player_to_move(state) {
            Player::Max => NodeKind::Or,
            Player::Min => NodeKind::And,
        }
    }

    /// Terminal classification is absolute w.r.t. MAX, not relative to
    /// whichever side is to move at this node: the engine proves "MAX
    /// wins", so any terminal favoring MAX is PROVEN and anything else
    /// (a MIN win or a draw) is DISPROVEN, regardless of node kind. A
    /// MAX-winning terminal is reached by an AND node (it's MIN's move
    /// that led there being refuted) just as often as by an OR node, so
    /// keying this off `NodeKind` would make every MAX-winning terminal
    /// reachable only through an OR node - never true in practice - and
    /// the root could never be proven.
    fn classify_terminal(&self, state: &G::State) -> (u64, u64, ProofStatus) {
        let utility = self.game.utility(state);
        if utility > 0 {
            (0, INFINITY, ProofStatus::Proven)
        } else {
            (INFINITY, 0, ProofStatus::Disproven)
        }
    }

    fn evaluate_node(&mut self, arena: &mut Vec<PnNode<G::State, G::Action>>, idx: usize) {
        let state = arena[idx].state.clone();
        let key = state.zobrist_hash();

        if let Some((phi, delta, status)) = self.table.get(&key).copied() {
            arena[idx].phi = phi;
            arena[idx].delta = delta;
            arena[idx].status = status;
            return;
        }

        if self.game.is_terminal(&state) {
            let (phi, delta, status) = self.classify_terminal(&state);
            arena[idx].phi = phi;
            arena[idx].delta = delta;
            arena[idx].status = status;
        } else {
            arena[idx].phi = 1;
            arena[idx].delta = 1;
            arena[idx].status = ProofStatus::Unknown;
        }
        self.table.insert(key, (arena[idx].phi, arena[idx].delta, arena[idx].status));
    }

    /// Descends from `root` picking the most-proving child, aborting (and
    /// returning `None`) if the descent revisits a hash already on the
    /// current path.
    fn select_most_proving_node(
        &self,
        arena: &[PnNode<G::State, G::Action>],
        root: usize,
    ) -> Option<usize> {
        let mut current = root;
        let mut path = HashSet::new();
        path.insert(arena[root].state.zobrist_hash());

        loop {
            let node = &arena[current];
            if !node.expanded || node.status != ProofStatus::Unknown {
                return Some(current);
            }
            if node.children.is_empty() {
                return Some(current);
            }

            let next = match node.kind {
                NodeKind::Or => *node.children.iter().min_by_key(|&&c| arena[c].phi)?,
                NodeKind::And => *node.children.iter().min_by_key(|&&c| arena[c].delta)?,
            };
            let next_hash = arena[next].state.zobrist_hash();
            if !path.insert(next_hash) {
                return None;
            }
            current = next;
        }
    }

    fn expand_node(&mut self, arena: &mut Vec<PnNode<G::State, G::Action>>, idx: usize) {
        let state = arena[idx].state.clone();
        let actions = self.game.possible_actions(&state);

        for action in actions {
            let child_state = self.game.apply(&state, &action);
            let child_kind = self.node_kind(&child_state);
            let child_idx = arena.len();
            arena.push(PnNode {
                state: child_state,
                parent: Some(idx),
                action_into: Some(action),
                children: Vec::new(),
                expanded: false,
                phi: 1,
                delta: 1,
                status: ProofStatus::Unknown,
                kind: child_kind,
            });
            self.evaluate_node(arena, child_idx);
            arena[idx].children.push(child_idx);
            self.nodes_created += 1;
        }

        arena[idx].expanded = true;
        self.update_proof_numbers(arena, idx);
    }

    fn update_proof_numbers(&mut self, arena: &mut [PnNode<G::State, G::Action>], idx: usize) {
        let kind = arena[idx].kind;
        let children = arena[idx].children.clone();

        let (phi, delta) = match kind {
            NodeKind::Or => {
                let phi = children.iter().map(|&c| arena[c].phi).min().unwrap_or(INFINITY);
                let delta = children
                    .iter()
                    .map(|&c| arena[c].delta)
                    .fold(0u64, |acc, d| (acc + d).min(INFINITY));
                (phi, delta)
            }
            NodeKind::And => {
                let phi = children
                    .iter()
                    .map(|&c| arena[c].phi)
                    .fold(0u64, |acc, p| (acc + p).min(INFINITY));
                let delta = children.iter().map(|&c| arena[c].delta).min().unwrap_or(INFINITY);
                (phi, delta)
            }
        };

        let status = if phi == 0 {
            ProofStatus::Proven
        } else if delta == 0 {
            ProofStatus::Disproven
        } else {
            ProofStatus::Unknown
        };

        arena[idx].phi = phi;
        arena[idx].delta = delta;
        arena[idx].status = status;

        let key = arena[idx].state.zobrist_hash();
        self.table.insert(key, (phi, delta, status));
    }

    fn propagate(&mut self, arena: &mut Vec<PnNode<G::State, G::Action>>, from: usize) {
        let mut current = Some(from);
        while let Some(idx) = current {
            let before = (arena[idx].phi, arena[idx].delta, arena[idx].status);
            self.update_proof_numbers(arena, idx);
            let after = (arena[idx].phi, arena[idx].delta, arena[idx].status);
            if before == after {
                break;
            }
            current = arena[idx].parent;
        }
    }
}

impl<G: Game + Clone> Strategy<G> for PnSearch<G>
where
    G::State: Zobrist,
{
    fn choose_best_move(&mut self, state: &G::State) -> Option<G::State> {
        self.nodes_created = 0;
        self.table.clear();

        if self.game.is_terminal(state) {
            return None;
        }

        let mut arena: Vec<PnNode<G::State, G::Action>> = Vec::new();
        let root_kind = self.node_kind(state);
        arena.push(PnNode {
            state: state.clone(),
            parent: None,
            action_into: None,
            children: Vec::new(),
            expanded: false,
            phi: 1,
            delta: 1,
            status: ProofStatus::Unknown,
            kind: root_kind,
        });
        self.evaluate_node(&mut arena, 0);

        while arena[0].status == ProofStatus::Unknown && self.nodes_created < self.node_budget {
            match self.select_most_proving_node(&arena, 0) {
                Some(target) => {
                    if arena[target].expanded {
                        break;
                    }
                    self.expand_node(&mut arena, target);
                    self.propagate(&mut arena, target);
                }
                None => break,
            }
        }

        self.last_status = arena[0].status;
        debug!(
            "pn-search move chosen: nodes_created={} tt_size={} status={:?}",
            self.nodes_created,
            self.table.len(),
            arena[0].status
        );

        if arena[0].children.is_empty() {
            return self.game.possible_actions(state).into_iter().next().map(|a| self.game.apply(state, &a));
        }

        let chosen = match arena[0].status {
            ProofStatus::Proven => arena[0]
                .children
                .iter()
                .filter(|&&c| arena[c].phi == 0)
                .min_by_key(|&&c| arena[c].phi)
                .copied()
                .unwrap_or(arena[0].children[0]),
            ProofStatus::Disproven => {
                return self.game.possible_actions(state).into_iter().next().map(|a| self.game.apply(state, &a));
            }
            ProofStatus::Unknown => match root_kind {
                NodeKind::Or => *arena[0]
                    .children
                    .iter()
                    .min_by_key(|&&c| (arena[c].phi, u64::MAX - arena[c].delta))
                    .unwrap(),
                NodeKind::And => *arena[0]
                    .children
                    .iter()
                    .min_by_key(|&&c| (arena[c].delta, u64::MAX - arena[c].phi))
                    .unwrap(),
            },
        };

        arena[chosen].action_into.map(|a| self.game.apply(state, &a))
    }
}
