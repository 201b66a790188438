//! Board model: the 3x3 game and the composed 9-board "ultimate" variant

pub mod lines;
pub mod state;
pub mod ultimate;

pub use state::{BoardState, Cell, Mark, Outcome};
pub use ultimate::{UltimateAction, UltimateBoard};
