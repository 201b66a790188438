//! Off-policy Monte-Carlo control with an ε-greedy behavior policy
//!
//! Action values are learned by incremental averaging over episode traces.
//! After every episode the behavior policy of each visited state is rebuilt
//! around the current greedy action: the greedy action gets probability
//! 1 - ε + ε/n and every other action ε/n, for n legal actions.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::BoardState;
use crate::error::{Error, Result};
use crate::ports::{Agent, Observation};

/// ε-greedy Monte-Carlo action-value learner
pub struct OffPolicyAgent {
    pub epsilon: f64,
    pub actions: HashMap<BoardState, Vec<usize>>,
    pub behavior: HashMap<BoardState, Vec<f64>>,
    pub action_values: HashMap<(BoardState, usize), f64>,
    pub counts: HashMap<(BoardState, usize), usize>,
    rng: StdRng,
    name: String,
}

impl OffPolicyAgent {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0 <= epsilon <= 1`.
    pub fn new(epsilon: f64) -> Result<Self> {
        Self::with_seed(epsilon, rand::rng().random())
    }

    pub fn with_seed(epsilon: f64, seed: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon must be within [0, 1], got {epsilon}"),
            });
        }
        Ok(OffPolicyAgent {
            epsilon,
            actions: HashMap::new(),
            behavior: HashMap::new(),
            action_values: HashMap::new(),
            counts: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            name: "off-policy".to_string(),
        })
    }

    /// Initialize a state with a uniform behavior policy and zero values
    pub fn ensure_state(&mut self, state: BoardState) {
        if self.actions.contains_key(&state) {
            return;
        }
        let actions = state.legal_actions();
        if !actions.is_empty() {
            let uniform = 1.0 / actions.len() as f64;
            self.behavior.insert(state, vec![uniform; actions.len()]);
        } else {
            self.behavior.insert(state, Vec::new());
        }
        for &action in &actions {
            self.action_values.insert((state, action), 0.0);
            self.counts.insert((state, action), 0);
        }
        self.actions.insert(state, actions);
    }

    /// Current action-value estimate, 0 when unvisited
    pub fn action_value(&self, state: &BoardState, action: usize) -> f64 {
        self.action_values
            .get(&(*state, action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Greedy action for a known state; ties go to the lowest action
    fn greedy_action(&self, state: &BoardState) -> Option<usize> {
        let actions = self.actions.get(state)?;
        let mut best: Option<(usize, f64)> = None;
        for &action in actions {
            let q = self.action_value(state, action);
            if best.is_none_or(|(_, best_q)| q > best_q) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Re-center the state's behavior policy on its greedy action
    fn rebuild_behavior(&mut self, state: &BoardState) {
        let Some(greedy) = self.greedy_action(state) else {
            return;
        };
        let Some(actions) = self.actions.get(state) else {
            return;
        };
        let exploration = self.epsilon / actions.len() as f64;
        let probabilities = actions
            .iter()
            .map(|&action| {
                if action == greedy {
                    1.0 - self.epsilon + exploration
                } else {
                    exploration
                }
            })
            .collect();
        self.behavior.insert(*state, probabilities);
    }

    fn sample_index(rng: &mut StdRng, probabilities: &[f64]) -> usize {
        let threshold = rng.random::<f64>();
        let mut cumulative = 0.0;
        for (index, &probability) in probabilities.iter().enumerate() {
            cumulative += probability;
            if threshold < cumulative {
                return index;
            }
        }
        probabilities.len() - 1
    }
}

impl Agent for OffPolicyAgent {
    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        self.ensure_state(observation.state);
        let actions = &self.actions[&observation.state];
        if actions.is_empty() {
            return Err(Error::NoLegalActions);
        }
        let probabilities = &self.behavior[&observation.state];
        let index = Self::sample_index(&mut self.rng, probabilities);
        Ok(actions[index])
    }

    fn observe_episode(&mut self, steps: &[(BoardState, usize)], reward: f64) -> Result<()> {
        let mut visited = HashSet::new();
        for &(state, action) in steps {
            self.ensure_state(state);
            let count = self.counts.entry((state, action)).or_insert(0);
            *count += 1;
            let value = self.action_values.entry((state, action)).or_insert(0.0);
            *value += (reward - *value) / *count as f64;
            visited.insert(state);
        }
        for state in visited {
            self.rebuild_behavior(&state);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
