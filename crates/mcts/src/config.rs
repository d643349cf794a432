//! Planner configuration parameters.

use crate::stats::StatScope;
use replan_core::{PlanError, Result};

/// Planner configuration parameters.
///
/// Validated once, at planner construction; a search never re-checks them.
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Rollout depth limit `d`: maximum random steps taken past the tree
    /// frontier per simulation. A depth of zero disables rollouts.
    pub rollout_depth: usize,

    /// Simulation budget `m`: number of simulations per search. Must be
    /// positive.
    pub simulations: usize,

    /// UCT exploration constant `c`. Larger values weigh the visit-count
    /// bonus more heavily against the Q-value. Must be finite and
    /// non-negative.
    pub exploration: f64,

    /// Discount factor `gamma` in (0, 1].
    pub discount: f64,

    /// How Q-values and visit counts are keyed; see [`StatScope`].
    pub stat_scope: StatScope,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rollout_depth: 15,
            simulations: 50,
            exploration: 1.44,
            discount: 0.999,
            stat_scope: StatScope::SharedByState,
        }
    }
}

impl PlannerConfig {
    /// Create a config with the specified simulation budget.
    pub fn with_simulations(simulations: usize) -> Self {
        Self {
            simulations,
            ..Default::default()
        }
    }

    /// Check the parameter ranges, as done at planner construction.
    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(PlanError::InvalidConfiguration(
                "simulation budget must be positive".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(PlanError::InvalidConfiguration(format!(
                "exploration constant {} must be finite and non-negative",
                self.exploration
            )));
        }
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(PlanError::InvalidConfiguration(format!(
                "discount factor {} is outside (0, 1]",
                self.discount
            )));
        }
        Ok(())
    }
}
