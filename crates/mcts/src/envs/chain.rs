//! A three-state deterministic chain with one rewarding path.
//!
//! Action 0 walks the chain: state 0 to 1 for reward 1, then 1 to 2 for
//! reward 10, where the episode ends. Action 1 bails out immediately for
//! reward -1 from any state. A planner that explores, discounts, and
//! backs values up correctly must prefer the walk from the start state,
//! which makes the chain a convenient end-to-end check.

use replan_core::{Transition, TransitionModel};

/// The chain walk/bail-out model.
#[derive(Clone, Debug)]
pub struct Chain {
    position: u8,
    done: bool,
}

impl Chain {
    /// Walk one step along the chain.
    pub const WALK: usize = 0;
    /// End the episode immediately for -1.
    pub const BAIL: usize = 1;

    /// Start at position 0.
    pub fn new() -> Self {
        Self {
            position: 0,
            done: false,
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionModel for Chain {
    type State = u8;

    fn state(&self) -> u8 {
        self.position
    }

    fn action_count(&self) -> usize {
        2
    }

    fn step(&mut self, action: usize) -> Transition<u8> {
        assert!(!self.done, "BUG: step on a finished chain");
        assert!(action < 2, "BUG: action {action} out of range");

        if action == Self::BAIL {
            self.done = true;
            return Transition {
                state: self.position,
                reward: -1.0,
                terminated: true,
                truncated: false,
            };
        }

        self.position += 1;
        let (reward, terminated) = if self.position == 1 {
            (1.0, false)
        } else {
            (10.0, true)
        };
        self.done = terminated;

        Transition {
            state: self.position,
            reward,
            terminated,
            truncated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_to_the_end() {
        let mut chain = Chain::new();

        let first = chain.step(Chain::WALK);
        assert_eq!(first.state, 1);
        assert_eq!(first.reward, 1.0);
        assert!(!first.is_final());

        let second = chain.step(Chain::WALK);
        assert_eq!(second.state, 2);
        assert_eq!(second.reward, 10.0);
        assert!(second.terminated);
    }

    #[test]
    fn test_bail_ends_immediately() {
        let mut chain = Chain::new();
        let t = chain.step(Chain::BAIL);

        assert_eq!(t.reward, -1.0);
        assert!(t.terminated);
    }

    #[test]
    #[should_panic(expected = "BUG: step on a finished chain")]
    fn test_step_after_end_panics() {
        let mut chain = Chain::new();
        chain.step(Chain::BAIL);
        chain.step(Chain::WALK);
    }
}
