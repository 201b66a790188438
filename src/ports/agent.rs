//! The agent port
//!
//! Every player, learning or fixed, implements [`Agent`]. The match driver
//! owns the board and hands each agent a perspective-canonical
//! [`Observation`], so agents never see which physical side they occupy.

use crate::board::BoardState;
use crate::error::Result;

/// What an agent sees when asked to move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Board in the agent's own perspective
    pub state: BoardState,
    /// Legal actions in that position, ascending cell order
    pub actions: Vec<usize>,
}

impl Observation {
    pub fn of(state: BoardState) -> Self {
        Observation {
            actions: state.legal_actions(),
            state,
        }
    }
}

/// A player in the match pipeline
///
/// `select_action` must return one of `observation.actions`; the driver
/// rejects anything else. The learning hooks default to no-ops so fixed
/// opponents only implement selection.
pub trait Agent {
    /// Choose an action for the observed position
    fn select_action(&mut self, observation: &Observation) -> Result<usize>;

    /// End-of-episode hook: the agent's own (state, action) trace in move
    /// order, plus the scalar return for the whole episode
    fn observe_episode(&mut self, steps: &[(BoardState, usize)], reward: f64) -> Result<()> {
        let _ = (steps, reward);
        Ok(())
    }

    /// Human-readable agent name, used in logs and error reports
    fn name(&self) -> &str;

    /// Reseed the agent's RNG for reproducible runs; no-op for
    /// deterministic agents
    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        let _ = seed;
        Ok(())
    }
}
