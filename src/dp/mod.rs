//! Dynamic programming: tabular policy iteration over the full state space

pub mod solver;
pub mod tables;

pub use solver::PolicyIterationSolver;
pub use tables::StateTables;
