//! State tables backing the policy-iteration solver

use std::collections::HashMap;

use crate::board::BoardState;

/// Value, policy, and action tables over every state the solver has seen
///
/// States are added lazily through [`ensure_state`](Self::ensure_state):
/// value 0, policy set to the first legal action, and the legal-action list
/// cached. Terminal states carry no policy.
#[derive(Debug, Clone, Default)]
pub struct StateTables {
    pub values: HashMap<BoardState, f64>,
    pub policy: HashMap<BoardState, usize>,
    pub actions: HashMap<BoardState, Vec<usize>>,
}

impl StateTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a state with default entries; does nothing if already present
    pub fn ensure_state(&mut self, state: BoardState) {
        if self.values.contains_key(&state) {
            return;
        }
        let actions = state.legal_actions();
        self.values.insert(state, 0.0);
        if let Some(&first) = actions.first() {
            self.policy.insert(state, first);
        }
        self.actions.insert(state, actions);
    }

    /// Current value estimate, 0 for unseen states
    pub fn value(&self, state: &BoardState) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
