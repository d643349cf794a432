//! Search tree node storage.
//!
//! Nodes live in an arena and reference each other by index, which keeps
//! the tree free of ownership cycles and makes teardown a single drop.

/// Index into the node arena.
///
/// A lightweight handle referencing a node in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the search tree: one (state reached, action that led there) pair.
#[derive(Clone, Debug)]
pub struct Node<S> {
    /// State the simulation observed on entering this node.
    pub state: S,

    /// Action stepped to reach this node (None for the root).
    pub incoming_action: Option<usize>,

    /// Whether the transition into this node ended the episode
    /// (terminated or truncated). Terminal nodes are never expanded.
    pub terminal: bool,

    /// Immediate reward received on the transition into this node.
    pub reward: f64,

    /// Parent node (None for the root).
    pub parent: Option<NodeId>,

    /// Child ids, filled all at once on expansion. After expansion the
    /// index into this vector *is* the action index; a slot is written
    /// exactly once.
    pub children: Vec<NodeId>,
}

impl<S> Node<S> {
    /// Create the root node: no parent, no action, not terminal, zero reward.
    pub fn root(state: S) -> Self {
        Self {
            state,
            incoming_action: None,
            terminal: false,
            reward: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create an unexpanded child node.
    pub fn child(parent: NodeId, action: usize, state: S, reward: f64, terminal: bool) -> Self {
        Self {
            state,
            incoming_action: Some(action),
            terminal,
            reward,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    /// True iff the node has not been expanded.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True iff the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
