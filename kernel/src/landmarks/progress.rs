//! Per-state landmark bookkeeping.
//!
//! [`LandmarkProgress`] is path-dependent: it is copied from the predecessor
//! and extended on every transition, never shared between states. A node is
//! only ever added when it is a leaf with respect to the current reached set
//! (all of its parents already reached), so the reached set is closed under
//! parents at all times.

use std::collections::BTreeSet;

use crate::landmarks::graph::{EdgeType, LandmarkGraph, LandmarkId, LandmarkNode};
use crate::task::operator::Operator;
use crate::task::variable::Fact;

/// Landmarks reached on the path to a state, with their summed cost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandmarkProgress {
    reached: BTreeSet<LandmarkId>,
    reached_cost: i64,
}

/// Reached landmarks that no longer hold but are needed again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeededLandmarks {
    pub landmarks: BTreeSet<LandmarkId>,
    pub cost: i64,
}

impl LandmarkProgress {
    /// Empty bookkeeping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reached set for the initial state.
    ///
    /// For every variable, the `(var, value)` simple landmark is taken if it
    /// exists and has no parents; only when no simple landmark exists is the
    /// covering disjunctive landmark considered, again only without parents.
    #[must_use]
    pub fn seed_initial(graph: Option<&LandmarkGraph>, vars: &[i32]) -> Self {
        let mut progress = Self::new();
        let Some(graph) = graph else {
            return progress;
        };
        for (var, &value) in vars.iter().enumerate() {
            let fact = Fact::new(var, value);
            let node = match graph.simple_landmark(fact) {
                Some(simple) => simple,
                None => match graph.disjunctive_landmark(fact) {
                    Some(disjunctive) => disjunctive,
                    None => continue,
                },
            };
            if node.parents.is_empty() && progress.reached.insert(node.id) {
                progress.reached_cost += node.min_cost;
            }
        }
        tracing::info!(
            initial = progress.reached.len(),
            goal = graph.goal_count(),
            "seeded initial-state landmarks"
        );
        progress
    }

    /// Extend the reached set after `op` produced the discrete vector `vars`.
    ///
    /// Two passes: the operator's effects that actually hold in `vars`, then
    /// a scan of every node (axiom-derived changes have no effect entry).
    /// Both passes only admit leaves.
    pub fn update(&mut self, graph: Option<&LandmarkGraph>, op: &Operator, vars: &[i32]) {
        let Some(graph) = graph else {
            return;
        };
        for pre_post in &op.pre_post {
            // The effect may have been conditional or overwritten later in
            // the same operator.
            if vars.get(pre_post.var) != Some(&pre_post.post) {
                continue;
            }
            if let Some(node) = graph.landmark_reached(Fact::new(pre_post.var, pre_post.post)) {
                self.try_reach(node, "effect");
            }
        }
        for node in graph.nodes() {
            if node.is_true_in_state(vars) {
                self.try_reach(node, "scan");
            }
        }
    }

    /// Reached landmarks false in `vars` that must be achieved again: goal
    /// landmarks, and landmarks with an unreached goal-necessary child.
    #[must_use]
    pub fn needed(&self, graph: Option<&LandmarkGraph>, vars: &[i32]) -> NeededLandmarks {
        let mut needed = NeededLandmarks::default();
        let Some(graph) = graph else {
            return needed;
        };
        for &id in &self.reached {
            let node = graph.node(id);
            if node.is_true_in_state(vars) {
                continue;
            }
            if node.is_goal || lost_children_needed_again(node, &self.reached) {
                needed.landmarks.insert(id);
                needed.cost += node.min_cost;
            }
        }
        needed
    }

    /// The reached set and its cost, as stored.
    #[must_use]
    pub fn partial_plan(&self) -> (&BTreeSet<LandmarkId>, i64) {
        (&self.reached, self.reached_cost)
    }

    #[must_use]
    pub fn reached(&self) -> &BTreeSet<LandmarkId> {
        &self.reached
    }

    #[must_use]
    pub const fn reached_cost(&self) -> i64 {
        self.reached_cost
    }

    #[must_use]
    pub fn is_reached(&self, id: LandmarkId) -> bool {
        self.reached.contains(&id)
    }

    fn try_reach(&mut self, node: &LandmarkNode, via: &'static str) {
        if self.reached.contains(&node.id) || !landmark_is_leaf(node, &self.reached) {
            return;
        }
        self.reached.insert(node.id);
        self.reached_cost += node.min_cost;
        tracing::debug!(landmark = %node.id, via, cost = node.min_cost, "landmark reached");
    }
}

/// A node is a leaf when every parent, whatever the edge type, is reached.
#[must_use]
pub fn landmark_is_leaf(node: &LandmarkNode, reached: &BTreeSet<LandmarkId>) -> bool {
    node.parents.keys().all(|parent| reached.contains(parent))
}

/// True when some goal-necessary child of `node` is not reached yet.
#[must_use]
pub fn lost_children_needed_again(node: &LandmarkNode, reached: &BTreeSet<LandmarkId>) -> bool {
    node.children
        .iter()
        .any(|(child, &edge)| edge == EdgeType::GoalNecessary && !reached.contains(child))
}
