//! Monte-Carlo afterstate learning with exploring starts
//!
//! The agent values afterstates, the boards resulting from its own moves,
//! rather than (state, action) pairs. Selection is greedy over the
//! afterstate values; exploration comes entirely from the exploring-starts
//! driver, so no exploration parameter lives here.

use std::collections::{HashMap, HashSet};

use crate::board::{BoardState, Mark};
use crate::error::{Error, Result};
use crate::ports::{Agent, Observation};

/// Greedy afterstate-value learner updated by first-visit incremental means
pub struct AfterstateAgent {
    pub values: HashMap<BoardState, f64>,
    pub counts: HashMap<BoardState, usize>,
    name: String,
}

impl AfterstateAgent {
    pub fn new() -> Self {
        AfterstateAgent {
            values: HashMap::new(),
            counts: HashMap::new(),
            name: "afterstates".to_string(),
        }
    }

    /// Current estimate for an afterstate, 0 when unvisited
    pub fn value(&self, afterstate: &BoardState) -> f64 {
        self.values.get(afterstate).copied().unwrap_or(0.0)
    }

    fn record(&mut self, afterstate: BoardState, reward: f64) {
        let count = self.counts.entry(afterstate).or_insert(0);
        *count += 1;
        let value = self.values.entry(afterstate).or_insert(0.0);
        *value += (reward - *value) / *count as f64;
    }
}

impl Default for AfterstateAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for AfterstateAgent {
    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &action in &observation.actions {
            let afterstate = observation.state.place(action, Mark::Mine)?;
            let value = self.value(&afterstate);
            // strictly greater keeps ties on the lowest action
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action).ok_or(Error::NoLegalActions)
    }

    fn observe_episode(&mut self, steps: &[(BoardState, usize)], reward: f64) -> Result<()> {
        // first-visit: each afterstate counts once per episode
        let mut visited = HashSet::new();
        for &(state, action) in steps {
            let afterstate = state.place(action, Mark::Mine)?;
            if visited.insert(afterstate) {
                self.record(afterstate, reward);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
