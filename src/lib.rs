//! Tabular reinforcement learning for noughts and crosses
//!
//! The crate models a perspective-canonical 3x3 board and drives tabular
//! agents over it: a policy-iteration solver against a uniform-random
//! opponent, a Monte-Carlo afterstate learner with exploring starts, and an
//! off-policy ε-greedy Monte-Carlo learner. Learned tables persist as plain
//! text. A composed "ultimate" board variant is provided as a board model.
//!
//! # Example
//!
//! ```
//! use oxrl::pipeline::{MatchDriver, RandomAgent, TrainingConfig, outcome_reward, train};
//! use oxrl::mc::AfterstateAgent;
//!
//! let mut agent = AfterstateAgent::new();
//! let mut opponent = RandomAgent::with_seed(1);
//! let config = TrainingConfig::new(100, 0, outcome_reward);
//! let rewards = train(&mut agent, &mut opponent, &MatchDriver::exploring(), &config).unwrap();
//! assert_eq!(rewards.len(), 100);
//! ```

pub mod board;
pub mod dp;
pub mod error;
pub mod mc;
pub mod persist;
pub mod pipeline;
pub mod ports;

pub use board::{BoardState, Cell, Mark, Outcome};
pub use error::{Error, Result};
pub use ports::{Agent, Observation};
