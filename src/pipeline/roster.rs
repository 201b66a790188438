//! Fixed opponents used for training and evaluation

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::ports::{Agent, Observation};

/// Picks a uniformly random legal action
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            name: "random".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        observation
            .actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalActions)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Takes the center when open, otherwise plays randomly
pub struct CenterAgent {
    name: String,
    rng: StdRng,
}

impl CenterAgent {
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    pub fn with_seed(seed: u64) -> Self {
        CenterAgent {
            name: "center".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for CenterAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for CenterAgent {
    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        if observation.actions.contains(&4) {
            return Ok(4);
        }
        observation
            .actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalActions)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
