//! Training and evaluation loops over the match driver

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::driver::MatchDriver;
use crate::ports::Agent;

/// Maps an episode's terminal scores to the scalar return of one seat
pub type RewardFn = fn(&[i32; 2], usize) -> f64;

/// The seat's own score minus the opponent's: +2 win, 0 draw, -2 loss
pub fn margin_reward(scores: &[i32; 2], seat: usize) -> f64 {
    f64::from(scores[seat] - scores[1 - seat])
}

/// The seat's own score: +1 win, 0 draw, -1 loss
pub fn outcome_reward(scores: &[i32; 2], seat: usize) -> f64 {
    f64::from(scores[seat])
}

/// Parameters of a training or evaluation run
#[derive(Debug, Clone, Copy)]
pub struct TrainingConfig {
    pub episodes: usize,
    pub seed: u64,
    pub reward: RewardFn,
}

impl TrainingConfig {
    pub fn new(episodes: usize, seed: u64, reward: RewardFn) -> Self {
        TrainingConfig {
            episodes,
            seed,
            reward,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 500,
            seed: 0,
            reward: margin_reward,
        }
    }
}

/// Aggregate results of an evaluation run, from the first seat's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub mean_reward: f64,
}

impl EvalResult {
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.wins as f64 / self.episodes as f64
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::io(format!("create {}", path.display()), e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open {}", path.display()), e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Train `agent` in seat 0 against `opponent` in seat 1
///
/// Both agents receive their episode trace and reward at the end of every
/// episode, so self-play pairs learn on both sides. Returns the per-episode
/// rewards of seat 0.
pub fn train(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    driver: &MatchDriver,
    config: &TrainingConfig,
) -> Result<Vec<f64>> {
    agent.set_rng_seed(config.seed)?;
    opponent.set_rng_seed(config.seed.wrapping_add(1))?;
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(2));

    let mut rewards = Vec::with_capacity(config.episodes);
    for _ in 0..config.episodes {
        let episode = driver.play(agent, opponent, &mut rng)?;

        let reward = (config.reward)(&episode.scores, 0);
        agent.observe_episode(&episode.trace_for(0), reward)?;
        opponent.observe_episode(&episode.trace_for(1), (config.reward)(&episode.scores, 1))?;

        rewards.push(reward);
    }
    Ok(rewards)
}

/// Evaluate `agent` in seat 0 against `opponent` without learning updates
pub fn evaluate(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    driver: &MatchDriver,
    config: &TrainingConfig,
) -> Result<EvalResult> {
    agent.set_rng_seed(config.seed)?;
    opponent.set_rng_seed(config.seed.wrapping_add(1))?;
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(2));

    let mut result = EvalResult {
        episodes: config.episodes,
        wins: 0,
        draws: 0,
        losses: 0,
        mean_reward: 0.0,
    };
    let mut reward_sum = 0.0;

    for _ in 0..config.episodes {
        let episode = driver.play(agent, opponent, &mut rng)?;
        match episode.scores[0] {
            1 => result.wins += 1,
            -1 => result.losses += 1,
            _ => result.draws += 1,
        }
        reward_sum += (config.reward)(&episode.scores, 0);
    }

    if config.episodes > 0 {
        result.mean_reward = reward_sum / config.episodes as f64;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_reward() {
        assert_eq!(margin_reward(&[1, -1], 0), 2.0);
        assert_eq!(margin_reward(&[1, -1], 1), -2.0);
        assert_eq!(margin_reward(&[0, 0], 0), 0.0);
    }

    #[test]
    fn test_outcome_reward() {
        assert_eq!(outcome_reward(&[-1, 1], 0), -1.0);
        assert_eq!(outcome_reward(&[-1, 1], 1), 1.0);
        assert_eq!(outcome_reward(&[0, 0], 1), 0.0);
    }

    #[test]
    fn test_win_rate() {
        let result = EvalResult {
            episodes: 4,
            wins: 3,
            draws: 1,
            losses: 0,
            mean_reward: 1.5,
        };
        assert_eq!(result.win_rate(), 0.75);
    }
}
