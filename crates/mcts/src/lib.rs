//! Monte Carlo Tree Search planning with UCT.
//!
//! This crate selects one action per real decision epoch by running
//! repeated simulated rollouts against snapshots of a transition model,
//! growing a search tree that concentrates effort on promising action
//! sequences.
//!
//! # Features
//!
//! - **Generic**: works with any [`replan_core::TransitionModel`]
//! - **UCT selection**: visit-count exploration bonus with first-play
//!   urgency, random tie-breaking
//! - **Global statistics**: Q-values and visit counts keyed by state
//!   value (or per node, see [`StatScope`]) rather than stored on nodes
//! - **Deterministic**: all randomness flows through one explicitly
//!   passed RNG
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use replan_mcts::{envs::Chain, Planner, PlannerConfig};
//!
//! let config = PlannerConfig::with_simulations(100);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut planner = Planner::new(Chain::new(), config, rng).unwrap();
//!
//! let outcome = planner.search();
//! assert_eq!(outcome.best_action, Chain::WALK);
//! ```

pub mod config;
pub mod envs;
mod node;
pub mod search;
pub mod stats;
mod tree;

pub use config::PlannerConfig;
pub use node::NodeId;
pub use search::{Planner, SearchOutcome};
pub use stats::{StatScope, StatTable};
