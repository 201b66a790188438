//! Monte-Carlo learners: afterstate values and off-policy action values

pub mod afterstates;
pub mod off_policy;

pub use afterstates::AfterstateAgent;
pub use off_policy::OffPolicyAgent;
