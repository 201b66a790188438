//! Command-line entry point for training and evaluating agents

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use oxrl::dp::PolicyIterationSolver;
use oxrl::mc::{AfterstateAgent, OffPolicyAgent};
use oxrl::persist;
use oxrl::pipeline::{
    CenterAgent, MatchDriver, RandomAgent, TrainingConfig, evaluate, margin_reward,
    outcome_reward, train,
};
use oxrl::ports::Agent;

const CHUNK: usize = 100;

#[derive(Parser)]
#[command(name = "oxrl", about = "Tabular reinforcement learning for noughts and crosses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Opponent {
    Random,
    Center,
}

impl Opponent {
    fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            Opponent::Random => Box::new(RandomAgent::with_seed(seed)),
            Opponent::Center => Box::new(CenterAgent::with_seed(seed)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the game by policy iteration and save the value table
    Dp {
        /// Convergence bound on the largest per-sweep value change
        #[arg(long, default_value_t = 0.1)]
        bound: f64,

        /// Give up after this many evaluation sweeps
        #[arg(long, default_value_t = 1000)]
        max_sweeps: usize,

        /// Output path for the state-value table
        #[arg(long, default_value = "dp-values.tsv")]
        values: PathBuf,
    },

    /// Train the afterstate learner with exploring starts
    Afterstates {
        #[arg(long, default_value_t = 10_000)]
        episodes: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output path for the afterstate-value table
        #[arg(long, default_value = "afterstate-values.tsv")]
        values: PathBuf,
    },

    /// Train the off-policy epsilon-greedy Monte-Carlo learner
    OffPolicy {
        #[arg(long, default_value_t = 10_000)]
        episodes: usize,

        #[arg(long, default_value_t = 0.1)]
        epsilon: f64,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,

        /// Output path for the action-value table
        #[arg(long, default_value = "action-values.tsv")]
        action_values: PathBuf,

        /// Optional JSON training summary
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Evaluate a saved afterstate-value table against a fixed opponent
    Evaluate {
        /// Path to a saved afterstate-value table
        #[arg(long)]
        values: PathBuf,

        #[arg(long, default_value_t = 1000)]
        episodes: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,

        /// Optional JSON result output
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TrainingSummary {
    episodes: usize,
    mean_reward: f64,
    states: usize,
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// Run the training loop in chunks so the progress bar advances
fn train_chunked(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    driver: &MatchDriver,
    config: &TrainingConfig,
) -> Result<Vec<f64>> {
    let bar = progress_bar(config.episodes as u64);
    let mut rewards = Vec::with_capacity(config.episodes);

    let mut remaining = config.episodes;
    let mut chunk_index = 0u64;
    while remaining > 0 {
        let batch = remaining.min(CHUNK);
        let chunk_config = TrainingConfig::new(
            batch,
            config.seed.wrapping_add(chunk_index),
            config.reward,
        );
        rewards.extend(train(agent, opponent, driver, &chunk_config)?);
        bar.inc(batch as u64);
        remaining -= batch;
        chunk_index += 1;
    }

    bar.finish_and_clear();
    Ok(rewards)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dp {
            bound,
            max_sweeps,
            values,
        } => {
            let mut solver = PolicyIterationSolver::with_bound(bound, max_sweeps);
            solver.solve()?;
            persist::save_values(&values, &solver.tables.values)?;
            println!(
                "solved {} states, values written to {}",
                solver.tables.len(),
                values.display()
            );
        }

        Commands::Afterstates {
            episodes,
            seed,
            values,
        } => {
            let mut agent = AfterstateAgent::new();
            let mut opponent = RandomAgent::with_seed(seed);
            let config = TrainingConfig::new(episodes, seed, outcome_reward);

            let rewards = train_chunked(
                &mut agent,
                &mut opponent,
                &MatchDriver::exploring(),
                &config,
            )?;
            persist::save_values(&values, &agent.values)?;
            println!(
                "trained {} episodes, mean reward {:.3}, {} afterstates written to {}",
                episodes,
                mean(&rewards),
                agent.values.len(),
                values.display()
            );
        }

        Commands::OffPolicy {
            episodes,
            epsilon,
            seed,
            opponent,
            action_values,
            summary,
        } => {
            let mut agent = OffPolicyAgent::with_seed(epsilon, seed)?;
            let mut opponent = opponent.build(seed.wrapping_add(1));
            let config = TrainingConfig::new(episodes, seed, margin_reward);

            let rewards = train_chunked(
                &mut agent,
                opponent.as_mut(),
                &MatchDriver::new(),
                &config,
            )?;
            persist::save_action_values(&action_values, &agent.action_values)?;

            let report = TrainingSummary {
                episodes,
                mean_reward: mean(&rewards),
                states: agent.actions.len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(path) = summary {
                std::fs::write(&path, serde_json::to_vec_pretty(&report)?)?;
            }
        }

        Commands::Evaluate {
            values,
            episodes,
            seed,
            opponent,
            summary,
        } => {
            let mut agent = AfterstateAgent::new();
            agent.values = persist::load_values(&values)?;
            let mut opponent = opponent.build(seed.wrapping_add(1));
            let config = TrainingConfig::new(episodes, seed, outcome_reward);

            let result = evaluate(
                &mut agent,
                opponent.as_mut(),
                &MatchDriver::new(),
                &config,
            )?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if let Some(path) = summary {
                result.save(&path)?;
            }
        }
    }

    Ok(())
}
