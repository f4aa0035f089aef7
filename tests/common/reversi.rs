//! Minimal 8x8 Reversi/Othello, the one fixture with a genuine pass move
//! and multi-cell flips per action.

use adversearch::interface::{Evaluation, Game, Player, Winner, MAX_UTILITY};
use adversearch::zobrist::ZobristTable;
use adversearch::Zobrist;

pub const SIZE: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    W,
    B,
}

/// `None` is the pass move, legal only when the side to move has no flips
/// available anywhere on the board.
pub type ReversiAction = Option<(usize, usize)>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReversiState {
    pub board: [[Cell; SIZE]; SIZE],
    pub to_move: Player,
}

impl Zobrist for ReversiState {
    fn zobrist_hash(&self) -> u64 {
        let table = ZobristTable::new(SIZE, SIZE);
        let cells = self.board.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cell)| match cell {
                Cell::Empty => None,
                Cell::W => Some((0usize, r, c)),
                Cell::B => Some((1usize, r, c)),
            })
        });
        table.hash_cells(cells) ^ if self.to_move == Player::Max { 0 } else { 1 }
    }
}

#[derive(Clone, Copy)]
pub struct Reversi;

const DIRS: [(isize, isize); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

impl Reversi {
    fn mark_for(player: Player) -> Cell {
        match player {
            Player::Max => Cell::W,
            Player::Min => Cell::B,
        }
    }

    fn opponent_mark(player: Player) -> Cell {
        Self::mark_for(player.opponent())
    }

    fn flips_for(board: &[[Cell; SIZE]; SIZE], r: usize, c: usize, player: Player) -> Vec<(usize, usize)> {
        if board[r][c] != Cell::Empty {
            return Vec::new();
        }
        let mine = Self::mark_for(player);
        let theirs = Self::opponent_mark(player);
        let mut all_flips = Vec::new();

        for (dr, dc) in DIRS {
            let mut run = Vec::new();
            let mut rr = r as isize + dr;
            let mut cc = c as isize + dc;
            while rr >= 0 && cc >= 0 && (rr as usize) < SIZE && (cc as usize) < SIZE {
                let cell = board[rr as usize][cc as usize];
                if cell == theirs {
                    run.push((rr as usize, cc as usize));
                } else if cell == mine {
                    all_flips.extend(run);
                    break;
                } else {
                    break;
                }
                rr += dr;
                cc += dc;
            }
        }
        all_flips
    }

    fn legal_moves(&self, state: &ReversiState) -> Vec<(usize, usize)> {
        let mut moves = Vec::new();
        for r in 0..SIZE {
            for c in 0..SIZE {
                if !Self::flips_for(&state.board, r, c, state.to_move).is_empty() {
                    moves.push((r, c));
                }
            }
        }
        moves
    }

    fn counts(state: &ReversiState) -> (u32, u32) {
        let mut w = 0;
        let mut b = 0;
        for row in &state.board {
            for cell in row {
                match cell {
                    Cell::W => w += 1,
                    Cell::B => b += 1,
                    Cell::Empty => {}
                }
            }
        }
        (w, b)
    }
}

impl Game for Reversi {
    type State = ReversiState;
    type Action = ReversiAction;

    fn initial_state(&self) -> ReversiState {
        let mut board = [[Cell::Empty; SIZE]; SIZE];
        board[3][3] = Cell::W;
        board[4][4] = Cell::W;
        board[3][4] = Cell::B;
        board[4][3] = Cell::B;
        ReversiState { board, to_move: Player::Max }
    }

    fn possible_actions(&self, state: &ReversiState) -> Vec<ReversiAction> {
        let moves = self.legal_moves(state);
        if moves.is_empty() {
            vec![None]
        } else {
            moves.into_iter().map(Some).collect()
        }
    }

    fn apply(&self, state: &ReversiState, action: &ReversiAction) -> ReversiState {
        let mut board = state.board;
        if let Some((r, c)) = *action {
            let flips = Self::flips_for(&board, r, c, state.to_move);
            board[r][c] = Self::mark_for(state.to_move);
            for (fr, fc) in flips {
                board[fr][fc] = Self::mark_for(state.to_move);
            }
        }
        ReversiState { board, to_move: state.to_move.opponent() }
    }

    fn is_terminal(&self, state: &ReversiState) -> bool {
        if !self.legal_moves(state).is_empty() {
            return false;
        }
        let opponent_state = ReversiState { board: state.board, to_move: state.to_move.opponent() };
        self.legal_moves(&opponent_state).is_empty()
    }

    fn utility(&self, state: &ReversiState) -> Evaluation {
        let (w, b) = Self::counts(state);
        use std::cmp::Ordering;
        match w.cmp(&b) {
            Ordering::Greater => MAX_UTILITY,
            Ordering::Less => -MAX_UTILITY,
            Ordering::Equal => 0,
        }
    }

    fn heuristic(&self, state: &ReversiState) -> Evaluation {
        let (w, b) = Self::counts(state);
        let disc_diff = w as Evaluation - b as Evaluation;
        let corner_weight = [(0, 0), (0, SIZE - 1), (SIZE - 1, 0), (SIZE - 1, SIZE - 1)]
            .iter()
            .map(|&(r, c)| match state.board[r][c] {
                Cell::W => 25,
                Cell::B => -25,
                Cell::Empty => 0,
            })
            .sum::<Evaluation>();
        disc_diff + corner_weight
    }

    fn winner(&self, state: &ReversiState) -> Option<Winner> {
        let (w, b) = Self::counts(state);
        use std::cmp::Ordering;
        match w.cmp(&b) {
            Ordering::Greater => Some(Player::Max),
            Ordering::Less => Some(Player::Min),
            Ordering::Equal => None,
        }
    }

    fn max_starts(&self) -> bool {
        true
    }

    fn player_to_move(&self, state: &ReversiState) -> Player {
        state.to_move
    }

    fn center_bias(&self, action: &ReversiAction) -> i32 {
        match action {
            Some((r, c)) => {
                let corner = [(0, 0), (0, SIZE - 1), (SIZE - 1, 0), (SIZE - 1, SIZE - 1)].contains(&(*r, *c));
                if corner {
                    5
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}
