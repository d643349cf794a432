//! Cart-pole balancing dynamics as a planning model.
//!
//! The classic control task: a pole hinged on a cart that slides along a
//! track, balanced by pushing the cart left (action 0) or right (action 1).
//! Every step pays reward 1; the episode terminates when the pole tips past
//! 12 degrees or the cart leaves the track, and truncates at a step limit.
//!
//! The physics (force, masses, Euler integration at 20 ms) match the
//! standard CartPole-v1 formulation, so planner results are comparable to
//! published baselines. [`DriftingCartPole`] adds non-stationary dynamics
//! on top.

mod drift;

pub use drift::DriftingCartPole;

use rand::Rng;
use replan_core::{Transition, TransitionModel};
use std::hash::{Hash, Hasher};

/// Cart position/velocity and pole angle/angular velocity.
#[derive(Clone, Copy, Debug, Default)]
pub struct CartState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartState {
    /// Bit-pattern identity, so states can key the planner's tables.
    /// Distinct encodings of numerically equal values (0.0 vs -0.0)
    /// count as distinct states.
    fn bits(&self) -> [u64; 4] {
        [
            self.x.to_bits(),
            self.x_dot.to_bits(),
            self.theta.to_bits(),
            self.theta_dot.to_bits(),
        ]
    }
}

impl PartialEq for CartState {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for CartState {}

impl Hash for CartState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const FORCE_MAG: f64 = 10.0;
/// Integration step, seconds.
const TAU: f64 = 0.02;
/// Track half-width; the cart fails past this.
const X_LIMIT: f64 = 2.4;
/// Failure angle: 12 degrees.
const THETA_LIMIT: f64 = 12.0 * std::f64::consts::PI / 180.0;

/// Default half-pole length.
pub const DEFAULT_POLE_LENGTH: f64 = 0.5;

/// Default episode step limit.
pub const DEFAULT_STEP_LIMIT: u32 = 500;

/// The cart-pole transition model.
#[derive(Clone, Debug)]
pub struct CartPole {
    state: CartState,
    /// Half-pole length; the parameter that drifts in the non-stationary
    /// variant.
    pole_length: f64,
    steps: u32,
    step_limit: u32,
    done: bool,
}

impl CartPole {
    /// A cart at rest with the pole exactly upright. Call [`reset`] for
    /// the usual randomized start.
    ///
    /// [`reset`]: CartPole::reset
    pub fn new() -> Self {
        Self::with_step_limit(DEFAULT_STEP_LIMIT)
    }

    /// Like [`CartPole::new`] with a custom episode step limit.
    pub fn with_step_limit(step_limit: u32) -> Self {
        Self {
            state: CartState::default(),
            pole_length: DEFAULT_POLE_LENGTH,
            steps: 0,
            step_limit,
            done: false,
        }
    }

    /// Restart the episode from a small random perturbation: all four
    /// state components uniform in [-0.05, 0.05].
    pub fn reset<R: Rng>(&mut self, rng: &mut R) -> CartState {
        self.state = CartState {
            x: rng.gen_range(-0.05..0.05),
            x_dot: rng.gen_range(-0.05..0.05),
            theta: rng.gen_range(-0.05..0.05),
            theta_dot: rng.gen_range(-0.05..0.05),
        };
        self.steps = 0;
        self.done = false;
        self.state
    }

    /// Current half-pole length.
    pub fn pole_length(&self) -> f64 {
        self.pole_length
    }

    pub(crate) fn set_pole_length(&mut self, pole_length: f64) {
        self.pole_length = pole_length;
    }

    fn failed(state: &CartState) -> bool {
        state.x.abs() > X_LIMIT || state.theta.abs() > THETA_LIMIT
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: CartState) {
        self.state = state;
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionModel for CartPole {
    type State = CartState;

    fn state(&self) -> CartState {
        self.state
    }

    fn action_count(&self) -> usize {
        2
    }

    fn step(&mut self, action: usize) -> Transition<CartState> {
        assert!(!self.done, "BUG: step on a finished cart-pole");
        assert!(action < 2, "BUG: action {action} out of range");

        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let CartState {
            x,
            x_dot,
            theta,
            theta_dot,
        } = self.state;

        let total_mass = CART_MASS + POLE_MASS;
        let pole_mass_length = POLE_MASS * self.pole_length;
        let cos = theta.cos();
        let sin = theta.sin();

        let temp = (force + pole_mass_length * theta_dot * theta_dot * sin) / total_mass;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (self.pole_length * (4.0 / 3.0 - POLE_MASS * cos * cos / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos / total_mass;

        // Euler integration, matching the reference formulation.
        self.state = CartState {
            x: x + TAU * x_dot,
            x_dot: x_dot + TAU * x_acc,
            theta: theta + TAU * theta_dot,
            theta_dot: theta_dot + TAU * theta_acc,
        };
        self.steps += 1;

        let terminated = Self::failed(&self.state);
        let truncated = !terminated && self.steps >= self.step_limit;
        self.done = terminated || truncated;

        Transition {
            state: self.state,
            reward: 1.0,
            terminated,
            truncated,
        }
    }
}
