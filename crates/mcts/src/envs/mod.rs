//! Small environments used to validate the planner.

mod chain;

pub use chain::Chain;
