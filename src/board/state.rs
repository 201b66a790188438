//! Perspective-canonical board representation and basic operations

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lines;
use crate::error::Error;

/// A cell on the board, seen from the acting player's perspective
///
/// Every state handed to an agent is canonicalized so that the agent's own
/// marks are `Mine` and the opponent's are `Theirs`, regardless of which
/// physical side (X or O) the agent occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Mine,
    Theirs,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Mine => 'X',
            Cell::Theirs => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Mine),
            'O' | 'o' | '0' => Some(Cell::Theirs),
            _ => None,
        }
    }

    /// Negate the cell: my marks become the opponent's and vice versa
    pub fn flipped(self) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Mine => Cell::Theirs,
            Cell::Theirs => Cell::Mine,
        }
    }
}

/// A placeable mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Mine,
    Theirs,
}

impl Mark {
    pub fn flip(self) -> Mark {
        match self {
            Mark::Mine => Mark::Theirs,
            Mark::Theirs => Mark::Mine,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Mark::Mine => Cell::Mine,
            Mark::Theirs => Cell::Theirs,
        }
    }
}

/// Result of scoring a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Win(Mark),
    Draw,
}

/// An immutable 9-cell board state
///
/// This type implements `Copy` since it's only 9 bytes, and is used directly
/// as the key of value and policy tables. Two physically different boards that
/// are perspective mirrors of each other canonicalize to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
}

impl BoardState {
    /// Create an empty board
    pub fn empty() -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
        }
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_open(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    fn is_decided(&self) -> bool {
        lines::has_line(&self.cells, Mark::Mine)
            || lines::has_line(&self.cells, Mark::Theirs)
            || !self.cells.contains(&Cell::Empty)
    }

    /// Legal actions in this position: empty-cell indices, or nothing once the
    /// game is decided
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_decided() {
            return Vec::new();
        }
        self.empty_cells()
    }

    /// Place a mark and return the new board state
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] when the action is not in
    /// [`legal_actions`](Self::legal_actions).
    #[must_use = "place returns a new board state; the original is unchanged"]
    pub fn place(&self, action: usize, mark: Mark) -> Result<BoardState, Error> {
        if action >= 9 || !self.legal_actions().contains(&action) {
            return Err(Error::InvalidAction { action });
        }
        let mut next = *self;
        next.cells[action] = mark.cell();
        Ok(next)
    }

    /// Score the board
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] when both marks hold a winning line,
    /// which cannot happen if moves were applied through legal actions alone.
    pub fn outcome(&self) -> Result<Outcome, Error> {
        let mine = lines::has_line(&self.cells, Mark::Mine);
        let theirs = lines::has_line(&self.cells, Mark::Theirs);

        if mine && theirs {
            return Err(Error::InvalidState {
                message: format!("both marks hold a winning line in '{}'", self.encode()),
            });
        }
        if mine {
            Ok(Outcome::Win(Mark::Mine))
        } else if theirs {
            Ok(Outcome::Win(Mark::Theirs))
        } else if self.cells.contains(&Cell::Empty) {
            Ok(Outcome::Ongoing)
        } else {
            Ok(Outcome::Draw)
        }
    }

    /// Flip the board perspective, negating every non-empty cell
    ///
    /// Applied at the agent boundary so that every agent reasons as if its own
    /// mark were `Mine`.
    #[must_use = "flipped returns a new board state; the original is unchanged"]
    pub fn flipped(&self) -> BoardState {
        let mut flipped = *self;
        for cell in &mut flipped.cells {
            *cell = cell.flipped();
        }
        flipped
    }

    /// Textual label used as a persistence key, e.g. `XO.......`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }

    /// Parse a board from its 9-character label
    ///
    /// # Errors
    ///
    /// Returns an error when the label is not exactly 9 cells long or contains
    /// an invalid cell character.
    pub fn from_label(label: &str) -> Result<BoardState, Error> {
        let chars: Vec<char> = label.chars().collect();
        if chars.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                label: label.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                label: label.to_string(),
            })?;
        }

        Ok(BoardState { cells })
    }

    /// Draw a uniformly random board and redraw until it is still ongoing
    ///
    /// Used for exploring starts. Boards that score as decided, including the
    /// occasional double-win board a uniform draw can produce, are rejected.
    pub fn random_ongoing<R: Rng + ?Sized>(rng: &mut R) -> BoardState {
        loop {
            let mut cells = [Cell::Empty; 9];
            for cell in &mut cells {
                *cell = match rng.random_range(0..3) {
                    0 => Cell::Empty,
                    1 => Cell::Mine,
                    _ => Cell::Theirs,
                };
            }
            let board = BoardState { cells };
            if matches!(board.outcome(), Ok(Outcome::Ongoing)) {
                return board;
            }
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if i % 3 == 2 && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_empty_board() {
        let board = BoardState::empty();
        assert_eq!(board.legal_actions().len(), 9);
        assert_eq!(board.outcome().unwrap(), Outcome::Ongoing);
    }

    #[test]
    fn test_place() {
        let board = BoardState::empty();
        let next = board.place(4, Mark::Mine).unwrap();
        assert_eq!(next.get(4), Cell::Mine);
        // original is unchanged
        assert_eq!(board.get(4), Cell::Empty);

        // occupied cell
        assert!(next.place(4, Mark::Theirs).is_err());
        // out of bounds
        assert!(board.place(9, Mark::Mine).is_err());
    }

    #[test]
    fn test_legal_actions_idempotent() {
        let board = BoardState::from_label("XO.X.....").unwrap();
        assert_eq!(board.legal_actions(), board.legal_actions());
    }

    #[test]
    fn test_legal_actions_empty_once_decided() {
        let board = BoardState::from_label("XXXOO....").unwrap();
        assert_eq!(board.outcome().unwrap(), Outcome::Win(Mark::Mine));
        assert!(board.legal_actions().is_empty());
    }

    #[test]
    fn test_win_detection() {
        let board = BoardState::from_label("O..O..O.X").unwrap();
        assert_eq!(board.outcome().unwrap(), Outcome::Win(Mark::Theirs));
    }

    #[test]
    fn test_draw_detection() {
        let board = BoardState::from_label("XOXOXOOXO").unwrap();
        assert_eq!(board.outcome().unwrap(), Outcome::Draw);
    }

    #[test]
    fn test_double_win_is_invalid_state() {
        let board = BoardState::from_label("XXXOOO...").unwrap();
        assert!(matches!(
            board.outcome(),
            Err(Error::InvalidState { .. })
        ));
    }

    #[test]
    fn test_flipped() {
        let board = BoardState::from_label("XO.......").unwrap();
        let flipped = board.flipped();
        assert_eq!(flipped.get(0), Cell::Theirs);
        assert_eq!(flipped.get(1), Cell::Mine);
        assert_eq!(flipped.get(2), Cell::Empty);
        // involution
        assert_eq!(flipped.flipped(), board);
    }

    #[test]
    fn test_encode_roundtrip() {
        let board = BoardState::from_label("X.O.X.O.X").unwrap();
        assert_eq!(BoardState::from_label(&board.encode()).unwrap(), board);
        assert_eq!(BoardState::empty().encode(), ".........");
    }

    #[test]
    fn test_from_label_rejects_bad_input() {
        assert!(BoardState::from_label("XOZ......").is_err());
    }

    #[test]
    fn test_from_label_rejects_wrong_lengths() {
        // too short and too long both report the length mismatch
        assert!(matches!(
            BoardState::from_label("XO"),
            Err(Error::InvalidBoardLength { got: 2, .. })
        ));
        match BoardState::from_label("XO........") {
            Err(error @ Error::InvalidBoardLength { got: 10, .. }) => {
                assert!(error.to_string().contains("wrong length"));
            }
            other => panic!("expected InvalidBoardLength, got {other:?}"),
        }
    }

    #[test]
    fn test_random_ongoing() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let board = BoardState::random_ongoing(&mut rng);
            assert_eq!(board.outcome().unwrap(), Outcome::Ongoing);
            assert!(!board.legal_actions().is_empty());
        }
    }

    #[test]
    fn test_display() {
        let board = BoardState::from_label("XOX.O.X..").unwrap();
        let display = format!("{board}");
        assert!(display.contains("XOX"));
        assert!(display.contains(".O."));
        assert!(display.contains("X.."));
    }
}
