//! Ports: the boundary traits agents plug into

pub mod agent;

pub use agent::{Agent, Observation};
