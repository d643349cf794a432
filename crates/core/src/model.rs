use std::hash::Hash;

/// The outcome of stepping a transition model once.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S> {
    /// State reached by the step.
    pub state: S,

    /// Immediate reward received for the step.
    pub reward: f64,

    /// The episode ended inside the environment (failure/goal state).
    pub terminated: bool,

    /// The episode was cut off externally (e.g. a step limit).
    pub truncated: bool,
}

impl<S> Transition<S> {
    /// True if the episode is over for either reason.
    pub fn is_final(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A simulatable model of the environment's dynamics.
///
/// The planner never touches the caller's live environment: it takes
/// snapshots of the model and steps those. A snapshot must be a fully
/// independent copy - stepping it may not affect the original or any
/// other snapshot. The model's current state is captured at snapshot
/// time; there is no reset in this contract.
///
/// Stepping a model whose episode has already ended is a contract
/// violation and should fail loudly (panic), not return garbage.
pub trait TransitionModel: Clone + Send {
    /// The environment state. It doubles as a lookup key for the planner's
    /// statistics tables, hence the `Eq + Hash` bound: a state that cannot
    /// key a table is rejected at compile time.
    type State: Clone + Eq + Hash + Send;

    /// The model's current state.
    fn state(&self) -> Self::State;

    /// Number of discrete actions, fixed for the planning episode.
    fn action_count(&self) -> usize;

    /// Advance the model by one action, returning what was observed.
    fn step(&mut self, action: usize) -> Transition<Self::State>;

    /// Cheap, independent copy positioned at the current state.
    fn snapshot(&self) -> Self {
        self.clone()
    }
}
