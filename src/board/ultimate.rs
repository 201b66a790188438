//! Ultimate variant: nine local boards composed under a meta board
//!
//! Each move lands on one local board and sends the opponent to the local
//! board named by the cell just played. Winning a local board claims the
//! matching cell of the meta board; the meta board is scored with the
//! ordinary line rules.

use serde::{Deserialize, Serialize};

use super::state::{BoardState, Cell, Mark, Outcome};
use crate::error::Error;

/// A move on the ultimate board: which local board, and which cell in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UltimateAction {
    pub board: usize,
    pub cell: usize,
}

/// Nine local boards plus the meta board tracking which are claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltimateBoard {
    pub locals: [BoardState; 9],
    pub meta: BoardState,
    /// Local board the next move must land on; `None` allows any open board
    pub target: Option<usize>,
}

impl UltimateBoard {
    pub fn empty() -> Self {
        UltimateBoard {
            locals: [BoardState::empty(); 9],
            meta: BoardState::empty(),
            target: None,
        }
    }

    /// A local board is playable while it is unclaimed and still ongoing
    fn is_playable(&self, board: usize) -> bool {
        self.meta.get(board) == Cell::Empty
            && matches!(self.locals[board].outcome(), Ok(Outcome::Ongoing))
    }

    /// Local boards the next move may land on
    pub fn open_boards(&self) -> Vec<usize> {
        match self.target {
            Some(board) if self.is_playable(board) => vec![board],
            // sent to a dead board, or first move: anywhere playable
            _ => (0..9).filter(|&b| self.is_playable(b)).collect(),
        }
    }

    /// All legal moves in the current position
    pub fn legal_actions(&self) -> Vec<UltimateAction> {
        let mut actions = Vec::new();
        for board in self.open_boards() {
            for cell in self.locals[board].legal_actions() {
                actions.push(UltimateAction { board, cell });
            }
        }
        actions
    }

    /// Apply a move, claim the local board on the meta board if it was won,
    /// and send the opponent to the board named by the played cell
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] when the move does not target an open
    /// board or an empty cell within it.
    #[must_use = "place returns a new board; the original is unchanged"]
    pub fn place(&self, action: UltimateAction, mark: Mark) -> Result<UltimateBoard, Error> {
        if action.board >= 9 || !self.open_boards().contains(&action.board) {
            return Err(Error::InvalidAction {
                action: action.board,
            });
        }

        let mut next = *self;
        next.locals[action.board] = next.locals[action.board].place(action.cell, mark)?;

        if let Ok(Outcome::Win(winner)) = next.locals[action.board].outcome() {
            next.meta = next.meta.place(action.board, winner)?;
        }
        next.target = Some(action.cell);
        Ok(next)
    }

    /// Score the overall game
    ///
    /// The meta board decides wins; with no winner and no playable local
    /// board left, the game is a draw.
    pub fn outcome(&self) -> Result<Outcome, Error> {
        match self.meta.outcome()? {
            Outcome::Win(mark) => Ok(Outcome::Win(mark)),
            _ if self.legal_actions().is_empty() => Ok(Outcome::Draw),
            _ => Ok(Outcome::Ongoing),
        }
    }

    /// Flip the perspective of every local board and the meta board
    #[must_use = "flipped returns a new board; the original is unchanged"]
    pub fn flipped(&self) -> UltimateBoard {
        let mut flipped = *self;
        for local in &mut flipped.locals {
            *local = local.flipped();
        }
        flipped.meta = flipped.meta.flipped();
        flipped
    }
}

impl Default for UltimateBoard {
    fn default() -> Self {
        Self::empty()
    }
}
