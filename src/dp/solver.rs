//! Policy iteration against a uniform-random opponent
//!
//! The solver evaluates each state as the expected return of playing its
//! current policy action, with the opponent replying uniformly at random:
//! win 1, draw 0, loss -1. Evaluation sweeps expand the table lazily as new
//! replies are reached, so a sweep converges only once the table has stopped
//! growing and the largest value change is within the bound.

use crate::board::{BoardState, Mark, Outcome};
use crate::error::{Error, Result};
use crate::ports::{Agent, Observation};

use super::tables::StateTables;

const DEFAULT_BOUND: f64 = 0.1;
const DEFAULT_MAX_SWEEPS: usize = 1000;

/// Tabular policy-iteration solver
pub struct PolicyIterationSolver {
    pub tables: StateTables,
    bound: f64,
    max_sweeps: usize,
    name: String,
}

impl PolicyIterationSolver {
    pub fn new() -> Self {
        Self::with_bound(DEFAULT_BOUND, DEFAULT_MAX_SWEEPS)
    }

    pub fn with_bound(bound: f64, max_sweeps: usize) -> Self {
        PolicyIterationSolver {
            tables: StateTables::new(),
            bound,
            max_sweeps,
            name: "policy-iteration".to_string(),
        }
    }

    /// Seed the table with the empty board and each position reachable after
    /// a single opponent move, covering both first- and second-player starts
    pub fn seed_states(&mut self) -> Result<()> {
        let root = BoardState::empty();
        self.tables.ensure_state(root);
        for action in 0..9 {
            let reply = root.place(action, Mark::Theirs)?;
            self.tables.ensure_state(reply);
        }
        Ok(())
    }

    /// Expected return of playing `action` in `state` against the
    /// uniform-random opponent
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] for actions outside the state's legal
    /// set, including any action in a terminal state.
    pub fn expected_return(&mut self, state: BoardState, action: usize) -> Result<f64> {
        self.tables.ensure_state(state);
        let legal = self
            .tables
            .actions
            .get(&state)
            .is_some_and(|actions| actions.contains(&action));
        if !legal {
            return Err(Error::InvalidAction { action });
        }

        let my_move = state.place(action, Mark::Mine)?;
        match my_move.outcome()? {
            Outcome::Win(Mark::Mine) => return Ok(1.0),
            Outcome::Draw => return Ok(0.0),
            Outcome::Ongoing => {}
            Outcome::Win(Mark::Theirs) => {
                return Err(Error::InvalidState {
                    message: format!("own move lost the game in '{}'", my_move.encode()),
                });
            }
        }

        let replies = my_move.legal_actions();
        let probability = 1.0 / replies.len() as f64;
        let mut expectation = 0.0;

        for reply in replies {
            let opp_move = my_move.place(reply, Mark::Theirs)?;
            match opp_move.outcome()? {
                Outcome::Win(Mark::Theirs) => expectation -= probability,
                Outcome::Draw => {}
                Outcome::Ongoing => {
                    self.tables.ensure_state(opp_move);
                    expectation += probability * self.tables.value(&opp_move);
                }
                Outcome::Win(Mark::Mine) => {
                    return Err(Error::InvalidState {
                        message: format!(
                            "opponent move won for us in '{}'",
                            opp_move.encode()
                        ),
                    });
                }
            }
        }
        Ok(expectation)
    }

    /// Sweep values under the current policy until the table stops growing
    /// and the largest change falls within the bound
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConvergence`] when the sweep limit is exhausted.
    pub fn policy_evaluation(&mut self) -> Result<()> {
        let mut sweeps = 0;
        loop {
            let size_before = self.tables.len();
            let states: Vec<BoardState> = self.tables.values.keys().copied().collect();
            let mut delta: f64 = 0.0;

            for state in states {
                let Some(&action) = self.tables.policy.get(&state) else {
                    continue;
                };
                let updated = self.expected_return(state, action)?;
                let previous = self.tables.value(&state);
                delta = delta.max((updated - previous).abs());
                self.tables.values.insert(state, updated);
            }
            sweeps += 1;

            let grew = self.tables.len() > size_before;
            if !grew && delta <= self.bound {
                return Ok(());
            }
            if sweeps >= self.max_sweeps {
                return Err(Error::NonConvergence { sweeps, delta });
            }
        }
    }

    /// Point the policy at the greedy action for every state; ties go to the
    /// lowest action. Returns whether any policy entry changed.
    pub fn policy_improvement(&mut self) -> Result<bool> {
        let states: Vec<BoardState> = self.tables.values.keys().copied().collect();
        let mut changed = false;

        for state in states {
            let Some(actions) = self.tables.actions.get(&state).cloned() else {
                continue;
            };
            if actions.is_empty() {
                continue;
            }

            let mut best_action = actions[0];
            let mut best_return = self.expected_return(state, best_action)?;
            for &action in &actions[1..] {
                let q = self.expected_return(state, action)?;
                if q > best_return {
                    best_return = q;
                    best_action = action;
                }
            }

            if self.tables.policy.get(&state) != Some(&best_action) {
                self.tables.policy.insert(state, best_action);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Run full policy iteration: seed, then alternate evaluation and
    /// improvement until the policy is stable
    pub fn solve(&mut self) -> Result<()> {
        self.seed_states()?;
        loop {
            self.policy_evaluation()?;
            if !self.policy_improvement()? {
                return Ok(());
            }
        }
    }
}

impl Default for PolicyIterationSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for PolicyIterationSolver {
    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        self.tables.ensure_state(observation.state);
        self.tables
            .policy
            .get(&observation.state)
            .copied()
            .ok_or(Error::NoLegalActions)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
