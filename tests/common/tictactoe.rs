//! Minimal 3x3 Tic-Tac-Toe, used to exercise the engine against a tree
//! small enough to brute-force.

use adversearch::interface::{Evaluation, Game, Player, Winner, MAX_UTILITY};
use adversearch::zobrist::ZobristTable;
use adversearch::Zobrist;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    X,
    O,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TttState {
    pub board: [[Cell; 3]; 3],
    pub to_move: Player,
}

impl Zobrist for TttState {
    fn zobrist_hash(&self) -> u64 {
        let table = ZobristTable::new(3, 3);
        let cells = self.board.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cell)| match cell {
                Cell::Empty => None,
                Cell::X => Some((0usize, r, c)),
                Cell::O => Some((1usize, r, c)),
            })
        });
        table.hash_cells(cells) ^ if self.to_move == Player::Max { 0 } else { 1 }
    }
}

#[derive(Clone, Copy)]
pub struct TicTacToe;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

impl TicTacToe {
    fn mark_for(player: Player) -> Cell {
        match player {
            Player::Max => Cell::X,
            Player::Min => Cell::O,
        }
    }

    fn line_winner(&self, state: &TttState) -> Option<Player> {
        for line in LINES {
            let [a, b, c] = line;
            let (ra, ca) = a;
            let (rb, cb) = b;
            let (rc, cc) = c;
            let va = state.board[ra][ca];
            let vb = state.board[rb][cb];
            let vc = state.board[rc][cc];
            if va == vb && vb == vc {
                match va {
                    Cell::X => return Some(Player::Max),
                    Cell::O => return Some(Player::Min),
                    Cell::Empty => {}
                }
            }
        }
        None
    }
}

impl Game for TicTacToe {
    type State = TttState;
    type Action = (usize, usize);

    fn initial_state(&self) -> TttState {
        TttState { board: [[Cell::Empty; 3]; 3], to_move: Player::Max }
    }

    fn possible_actions(&self, state: &TttState) -> Vec<(usize, usize)> {
        let mut actions = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                if state.board[r][c] == Cell::Empty {
                    actions.push((r, c));
                }
            }
        }
        actions
    }

    fn apply(&self, state: &TttState, action: &(usize, usize)) -> TttState {
        let mut board = state.board;
        let (r, c) = *action;
        board[r][c] = Self::mark_for(state.to_move);
        TttState { board, to_move: state.to_move.opponent() }
    }

    fn is_terminal(&self, state: &TttState) -> bool {
        self.line_winner(state).is_some() || self.possible_actions(state).is_empty()
    }

    fn utility(&self, state: &TttState) -> Evaluation {
        match self.line_winner(state) {
            Some(Player::Max) => MAX_UTILITY,
            Some(Player::Min) => -MAX_UTILITY,
            None => 0,
        }
    }

    fn heuristic(&self, state: &TttState) -> Evaluation {
        let mut score = 0;
        for player in [Player::Max, Player::Min] {
            let mark = Self::mark_for(player);
            let mut two_in_a_row = 0;
            for line in LINES {
                let marks: Vec<Cell> = line.iter().map(|&(r, c)| state.board[r][c]).collect();
                let mine = marks.iter().filter(|&&m| m == mark).count();
                let empty = marks.iter().filter(|&&m| m == Cell::Empty).count();
                if mine == 2 && empty == 1 {
                    two_in_a_row += 1;
                }
            }
            let sign = player.sign();
            score += sign * (two_in_a_row as Evaluation) * 10;
            if state.board[1][1] == mark {
                score += sign * 3;
            }
        }
        score
    }

    fn winner(&self, state: &TttState) -> Option<Winner> {
        self.line_winner(state)
    }

    fn max_starts(&self) -> bool {
        true
    }

    fn player_to_move(&self, state: &TttState) -> Player {
        state.to_move
    }

    fn center_bias(&self, action: &(usize, usize)) -> i32 {
        if *action == (1, 1) {
            2
        } else {
            0
        }
    }
}
