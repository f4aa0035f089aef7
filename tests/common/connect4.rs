//! Minimal 6x7 Connect-4, used to exercise center-bias move ordering and
//! deeper alpha-beta/MTD(f) search than Tic-Tac-Toe allows.

use adversearch::interface::{Evaluation, Game, Player, Winner, MAX_UTILITY};
use adversearch::zobrist::ZobristTable;
use adversearch::Zobrist;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    X,
    O,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connect4State {
    pub board: [[Cell; COLS]; ROWS],
    pub to_move: Player,
}

impl Zobrist for Connect4State {
    fn zobrist_hash(&self) -> u64 {
        let table = ZobristTable::new(ROWS, COLS);
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
pub struct Connect4;

impl Connect4 {
    fn mark_for(player: Player) -> Cell {
        match player {
            Player::Max => Cell::X,
            Player::Min => Cell::O,
        }
    }

    fn drop_row(board: &[[Cell; COLS]; ROWS], col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&r| board[r][col] == Cell::Empty)
    }

    fn four_in_a_row_at(board: &[[Cell; COLS]; ROWS], r: usize, c: usize, mark: Cell) -> bool {
        if board[r][c] != mark {
            return false;
        }
        const DIRS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        for (dr, dc) in DIRS {
            let mut count = 1;
            for step in 1..4 {
                let rr = r as isize + dr * step;
                let cc = c as isize + dc * step;
                if rr < 0 || cc < 0 || rr as usize >= ROWS || cc as usize >= COLS {
                    break;
                }
                if board[rr as usize][cc as usize] == mark {
                    count += 1;
                } else {
                    break;
                }
            }
            if count >= 4 {
                return true;
            }
        }
        false
    }

    fn find_winner(&self, state: &Connect4State) -> Option<Player> {
        for r in 0..ROWS {
            for c in 0..COLS {
                if Self::four_in_a_row_at(&state.board, r, c, Cell::X) {
                    return Some(Player::Max);
                }
                if Self::four_in_a_row_at(&state.board, r, c, Cell::O) {
                    return Some(Player::Min);
                }
            }
        }
        None
    }
}

impl Game for Connect4 {
    type State = Connect4State;
    type Action = usize;

    fn initial_state(&self) -> Connect4State {
        Connect4State { board: [[Cell::Empty; COLS]; ROWS], to_move: Player::Max }
    }

    fn possible_actions(&self, state: &Connect4State) -> Vec<usize> {
        (0..COLS).filter(|&c| state.board[0][c] == Cell::Empty).collect()
    }

    fn apply(&self, state: &Connect4State, action: &usize) -> Connect4State {
        let mut board = state.board;
        let row = Self::drop_row(&board, *action).expect("column not full");
        board[row][*action] = Self::mark_for(state.to_move);
        Connect4State { board, to_move: state.to_move.opponent() }
    }

    fn is_terminal(&self, state: &Connect4State) -> bool {
        self.find_winner(state).is_some() || self.possible_actions(state).is_empty()
    }

    fn utility(&self, state: &Connect4State) -> Evaluation {
        match self.find_winner(state) {
            Some(Player::Max) => MAX_UTILITY,
            Some(Player::Min) => -MAX_UTILITY,
            None => 0,
        }
    }

    fn heuristic(&self, state: &Connect4State) -> Evaluation {
        let mut score = 0;
        for c in 0..COLS {
            let weight = 3 - (c as i32 - 3).abs();
            for r in 0..ROWS {
                match state.board[r][c] {
                    Cell::X => score += weight,
                    Cell::O => score -= weight,
                    Cell::Empty => {}
                }
            }
        }
        score
    }

    fn winner(&self, state: &Connect4State) -> Option<Winner> {
        self.find_winner(state)
    }

    fn max_starts(&self) -> bool {
        true
    }

    fn player_to_move(&self, state: &Connect4State) -> Player {
        state.to_move
    }

    fn center_bias(&self, action: &usize) -> i32 {
        3 - (*action as i32 - 3).abs()
    }
}
