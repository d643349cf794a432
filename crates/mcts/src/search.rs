//! UCT Monte Carlo Tree Search.
//!
//! Each of the `m` simulations runs selection, expansion, rollout, and
//! backpropagation to completion before the next begins; the only point
//! of independence between simulations is the model snapshot taken at the
//! top of each one. The caller's live model is never stepped.

use crate::{
    config::PlannerConfig,
    node::{Node, NodeId},
    stats::{StatKey, StatScope, StatTable},
    tree::Tree,
};
use rand::Rng;
use replan_core::{PlanError, Result, TransitionModel};

/// Result of one planning call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Root action with the highest visit count, ties broken uniformly
    /// at random.
    pub best_action: usize,

    /// Q(root, a) for every action in index order; 0.0 for actions the
    /// search never tried.
    pub action_values: Vec<f64>,

    /// N(root, a) for every action in index order.
    pub visit_counts: Vec<u64>,
}

/// UCT planner for one decision epoch.
///
/// A planner owns its tree and statistics tables and is built fresh per
/// real decision; dropping it tears the whole tree down. It plans against
/// snapshots of the model it was given and leaves the original untouched.
pub struct Planner<M: TransitionModel, R: Rng> {
    config: PlannerConfig,
    rng: R,
    model: M,
    action_count: usize,
    tree: Tree<M::State>,
    stats: StatTable<M::State>,
}

impl<M, R> Planner<M, R>
where
    M: TransitionModel,
    R: Rng,
{
    /// Create a planner rooted at the model's current state.
    ///
    /// # Errors
    /// Returns `PlanError::InvalidConfiguration` for an out-of-range
    /// parameter and `PlanError::EmptyActionSet` for a model with no
    /// actions. Nothing is checked again mid-search.
    pub fn new(model: M, config: PlannerConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let action_count = model.action_count();
        if action_count == 0 {
            return Err(PlanError::EmptyActionSet);
        }

        let tree = Tree::new(model.state());
        let stats = StatTable::new(action_count);
        Ok(Self {
            config,
            rng,
            model,
            action_count,
            tree,
            stats,
        })
    }

    /// Run the configured number of simulations, then pick the root action
    /// with the most visits.
    pub fn search(&mut self) -> SearchOutcome {
        for _ in 0..self.config.simulations {
            let sim = self.model.snapshot();
            let (node, mut sim) = self.tree_policy(sim);

            let rollout_return = if self.tree.get(node).terminal {
                0.0
            } else {
                self.rollout(&mut sim)
            };

            self.backpropagate(node, rollout_return);
        }

        self.best_action()
    }

    /// Read-only view of the Q/N tables, for diagnostics.
    pub fn stats(&self) -> &StatTable<M::State> {
        &self.stats
    }

    /// Walk the tree from the root to a terminal node or a freshly
    /// expanded child, advancing the simulation handle along the way.
    fn tree_policy(&mut self, mut sim: M) -> (NodeId, M) {
        let mut id = NodeId::ROOT;
        loop {
            if self.tree.get(id).terminal {
                return (id, sim);
            }
            if self.tree.get(id).is_leaf() {
                return self.expand(id, &sim);
            }

            let action = self.select_action(id);
            sim.step(action);
            id = self.tree.get(id).children[action];
        }
    }

    /// Full-width expansion: one child per action, each observed by
    /// stepping its own snapshot of the handle. Returns one of the new
    /// children uniformly at random, together with the snapshot that was
    /// stepped into it.
    fn expand(&mut self, id: NodeId, sim: &M) -> (NodeId, M) {
        assert!(
            !self.tree.get(id).terminal,
            "BUG: expansion of a terminal node"
        );
        assert!(
            self.tree.get(id).is_leaf(),
            "BUG: re-expansion of an expanded node"
        );

        let mut stepped: Vec<M> = Vec::with_capacity(self.action_count);
        for action in 0..self.action_count {
            let mut handle = sim.snapshot();
            let t = handle.step(action);
            let terminal = t.is_final();
            let child = self
                .tree
                .add(Node::child(id, action, t.state, t.reward, terminal));
            self.tree.get_mut(id).children.push(child);
            stepped.push(handle);
        }

        let pick = self.rng.gen_range(0..self.action_count);
        let child = self.tree.get(id).children[pick];
        (child, stepped.swap_remove(pick))
    }

    /// UCT pick among an expanded node's actions.
    ///
    /// Unvisited actions score +inf (first-play urgency), so every action
    /// receives a visit before the formula is compared on it; the visited
    /// branch therefore never divides by zero.
    fn select_action(&mut self, id: NodeId) -> usize {
        let key = self.stat_key(id);
        let entry = self
            .stats
            .get(&key)
            .expect("BUG: UCT selection from an unvisited state");
        assert!(
            entry.visits > 0,
            "BUG: UCT selection from an unvisited state"
        );

        let ln_n = (entry.visits as f64).ln();
        let c = self.config.exploration;
        let scores: Vec<f64> = entry
            .edges
            .iter()
            .map(|edge| {
                if edge.visits == 0 {
                    f64::INFINITY
                } else {
                    edge.q + c * (ln_n / edge.visits as f64).sqrt()
                }
            })
            .collect();

        argmax_random_tie(&scores, &mut self.rng)
    }

    /// Default policy: up to `rollout_depth` uniformly random steps from
    /// the handle's current state, returning the discounted reward sum.
    /// Discounting starts at gamma^0; the tree path's share is layered on
    /// during backpropagation.
    fn rollout(&mut self, sim: &mut M) -> f64 {
        let mut total = 0.0;
        let mut weight = 1.0;

        for _ in 0..self.config.rollout_depth {
            let action = self.rng.gen_range(0..self.action_count);
            let t = sim.step(action);
            total += weight * t.reward;
            if t.is_final() {
                break;
            }
            weight *= self.config.discount;
        }

        total
    }

    /// Walk parent links to the root, folding each node's entry reward
    /// into the return at its discount level and updating the edge into it.
    /// The root has no incoming edge and its own Q is never written.
    fn backpropagate(&mut self, mut id: NodeId, rollout_return: f64) {
        let mut ret = rollout_return;
        while let Some(parent) = self.tree.get(id).parent {
            let node = self.tree.get(id);
            let action = node
                .incoming_action
                .expect("BUG: non-root node without an incoming action");
            ret = node.reward + self.config.discount * ret;

            let key = self.stat_key(parent);
            self.stats.record(key, action, ret);
            id = parent;
        }

        debug_assert!(self.stats.is_consistent());
    }

    /// Extract the search outcome from the root's statistics.
    fn best_action(&mut self) -> SearchOutcome {
        let key = self.stat_key(NodeId::ROOT);
        let (visit_counts, action_values) = match self.stats.get(&key) {
            Some(entry) => (
                entry.edges.iter().map(|e| e.visits).collect::<Vec<_>>(),
                entry.edges.iter().map(|e| e.q).collect::<Vec<_>>(),
            ),
            // Reachable only if no simulation updated the root, which a
            // positive budget rules out; report the untried defaults.
            None => (vec![0; self.action_count], vec![0.0; self.action_count]),
        };

        let counts: Vec<f64> = visit_counts.iter().map(|&v| v as f64).collect();
        let best_action = argmax_random_tie(&counts, &mut self.rng);

        SearchOutcome {
            best_action,
            action_values,
            visit_counts,
        }
    }

    fn stat_key(&self, id: NodeId) -> StatKey<M::State> {
        match self.config.stat_scope {
            StatScope::SharedByState => StatKey::State(self.tree.get(id).state.clone()),
            StatScope::PerNode => StatKey::Node(id),
        }
    }
}

/// Index of the maximum score, ties broken uniformly at random rather than
/// by first index, so no action is systematically favored.
fn argmax_random_tie<R: Rng>(scores: &[f64], rng: &mut R) -> usize {
    debug_assert!(!scores.is_empty());

    let mut best = f64::NEG_INFINITY;
    let mut ties: Vec<usize> = Vec::new();
    for (i, &score) in scores.iter().enumerate() {
        if score > best {
            best = score;
            ties.clear();
            ties.push(i);
        } else if score == best {
            ties.push(i);
        }
    }

    if ties.len() == 1 {
        ties[0]
    } else {
        ties[rng.gen_range(0..ties.len())]
    }
}
