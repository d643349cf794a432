//! Non-stationary cart-pole: the pole grows at every real step.
//!
//! The drift only touches the live environment. A planner receives
//! [`DriftingCartPole::planning_model`], a frozen snapshot of the current
//! dynamics, so within one decision epoch the model it simulates is
//! stationary; the dynamics shift between epochs, which is exactly why
//! the harness rebuilds the planner each time.

use crate::{CartPole, CartState, DEFAULT_POLE_LENGTH, DEFAULT_STEP_LIMIT};
use rand::Rng;
use replan_core::{Transition, TransitionModel};

/// Cart-pole whose half-pole length grows by a fixed increment per real
/// step.
#[derive(Clone, Debug)]
pub struct DriftingCartPole {
    inner: CartPole,
    increment: f64,
}

impl DriftingCartPole {
    /// The increment used by the evaluation harness.
    pub const DEFAULT_INCREMENT: f64 = 0.1;

    /// Wrap a fresh cart-pole with the given per-step length increment.
    pub fn new(increment: f64) -> Self {
        Self::with_step_limit(increment, DEFAULT_STEP_LIMIT)
    }

    /// Like [`DriftingCartPole::new`] with a custom episode step limit.
    pub fn with_step_limit(increment: f64, step_limit: u32) -> Self {
        Self {
            inner: CartPole::with_step_limit(step_limit),
            increment,
        }
    }

    /// Restart the episode and restore the initial pole length.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) -> CartState {
        self.inner.set_pole_length(DEFAULT_POLE_LENGTH);
        self.inner.reset(rng)
    }

    /// Frozen snapshot of the current dynamics for one planning epoch.
    pub fn planning_model(&self) -> CartPole {
        self.inner.snapshot()
    }

    /// Step the live environment: the pole length is updated first, then
    /// the physics run under the new dynamics.
    pub fn step(&mut self, action: usize) -> Transition<CartState> {
        let grown = self.inner.pole_length() + self.increment;
        self.inner.set_pole_length(grown);
        self.inner.step(action)
    }

    /// Current half-pole length of the live environment.
    pub fn pole_length(&self) -> f64 {
        self.inner.pole_length()
    }

    /// Current state of the live environment.
    pub fn state(&self) -> CartState {
        self.inner.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pole_grows_each_real_step() {
        let mut env = DriftingCartPole::new(0.1);

        assert!((env.pole_length() - 0.5).abs() < 1e-12);
        env.step(1);
        assert!((env.pole_length() - 0.6).abs() < 1e-12);
        env.step(0);
        assert!((env.pole_length() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_planning_model_is_frozen() {
        let mut env = DriftingCartPole::new(0.1);
        env.step(1);

        let model = env.planning_model();
        env.step(0);
        env.step(1);

        // The snapshot keeps the dynamics from its epoch.
        assert!((model.pole_length() - 0.6).abs() < 1e-12);
        assert!((env.pole_length() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_planning_model_steps_do_not_leak() {
        let env = DriftingCartPole::new(0.1);
        let mut model = env.planning_model();

        model.step(1);
        model.step(1);

        assert_eq!(env.state(), CartState::default());
    }

    #[test]
    fn test_reset_restores_pole_length() {
        let mut env = DriftingCartPole::new(0.25);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        env.step(1);
        env.step(1);
        env.reset(&mut rng);

        assert!((env.pole_length() - DEFAULT_POLE_LENGTH).abs() < 1e-12);
    }

    #[test]
    fn test_drift_changes_the_physics() {
        let mut fixed = CartPole::new();
        let mut drifting = DriftingCartPole::new(0.5);

        let a = fixed.step(1);
        let b = drifting.step(1);

        assert_ne!(a.state, b.state);
    }
}
