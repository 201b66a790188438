//! Match pipeline: the episode driver, fixed opponents, and training loops

pub mod driver;
pub mod roster;
pub mod training;

pub use driver::{Episode, EpisodeStep, MatchDriver, StartRule, TurnRule};
pub use roster::{CenterAgent, RandomAgent};
pub use training::{
    EvalResult, RewardFn, TrainingConfig, evaluate, margin_reward, outcome_reward, train,
};
