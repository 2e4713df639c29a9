//! Landmark graph: arena of landmark nodes with typed ordering edges.
//!
//! Nodes are addressed by [`LandmarkId`] (an index into the arena), so
//! per-state bookkeeping is a plain set of ids. The graph is built once
//! through [`LandmarkGraphBuilder`] and is read-only afterwards.

use std::collections::{BTreeMap, HashMap};

use crate::task::variable::Fact;

/// Stable index of a node in its [`LandmarkGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LandmarkId(usize);

impl LandmarkId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lm#{}", self.0)
    }
}

/// Ordering relation between a parent and a child landmark.
///
/// Ordered by strength, weakest first. When the same pair is ordered twice,
/// the stronger relation is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    ObedientReasonable,
    Reasonable,
    Natural,
    /// The parent must be true immediately before the child is first
    /// achieved on the way to the goal. The only type the regression test
    /// looks at.
    GoalNecessary,
    Necessary,
}

/// A fact or disjunction of facts that every plan must make true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkNode {
    pub id: LandmarkId,
    pub facts: Vec<Fact>,
    pub disjunctive: bool,
    pub min_cost: i64,
    /// Part of the goal.
    pub is_goal: bool,
    pub parents: BTreeMap<LandmarkId, EdgeType>,
    pub children: BTreeMap<LandmarkId, EdgeType>,
}

impl LandmarkNode {
    /// True when any of the node's facts holds in `vars`.
    #[must_use]
    pub fn is_true_in_state(&self, vars: &[i32]) -> bool {
        self.facts.iter().any(|f| f.holds_in(vars))
    }
}

/// Typed failure while building a landmark graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandmarkGraphError {
    #[error("fact {fact} already belongs to landmark {existing}")]
    DuplicateFact { fact: Fact, existing: LandmarkId },
    #[error("disjunctive landmark needs at least one fact")]
    EmptyDisjunction,
    #[error("unknown landmark index {index}")]
    UnknownNode { index: usize },
    #[error("landmark {id} cannot be ordered before itself")]
    SelfEdge { id: LandmarkId },
}

/// Read-only landmark graph.
#[derive(Debug, Clone, Default)]
pub struct LandmarkGraph {
    nodes: Vec<LandmarkNode>,
    simple: HashMap<Fact, LandmarkId>,
    disjunctive: HashMap<Fact, LandmarkId>,
}

impl LandmarkGraph {
    #[must_use]
    pub fn builder() -> LandmarkGraphBuilder {
        LandmarkGraphBuilder::default()
    }

    /// All nodes in id order.
    #[must_use]
    pub fn nodes(&self) -> &[LandmarkNode] {
        &self.nodes
    }

    /// Node by id. Panics on an id from another graph.
    #[must_use]
    pub fn node(&self, id: LandmarkId) -> &LandmarkNode {
        &self.nodes[id.0]
    }

    /// Resolve a raw index.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<LandmarkId> {
        (index < self.nodes.len()).then_some(LandmarkId(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn goal_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_goal).count()
    }

    /// The single-fact landmark for `fact`, if any.
    #[must_use]
    pub fn simple_landmark(&self, fact: Fact) -> Option<&LandmarkNode> {
        self.simple.get(&fact).map(|&id| self.node(id))
    }

    /// The disjunctive landmark containing `fact`, if any.
    #[must_use]
    pub fn disjunctive_landmark(&self, fact: Fact) -> Option<&LandmarkNode> {
        self.disjunctive.get(&fact).map(|&id| self.node(id))
    }

    /// The landmark achieved by making `fact` true: the simple landmark if
    /// one exists, otherwise the covering disjunctive landmark.
    #[must_use]
    pub fn landmark_reached(&self, fact: Fact) -> Option<&LandmarkNode> {
        self.simple_landmark(fact)
            .or_else(|| self.disjunctive_landmark(fact))
    }

    /// Every fact mentioned by any landmark.
    pub fn facts(&self) -> impl Iterator<Item = Fact> + '_ {
        self.nodes.iter().flat_map(|n| n.facts.iter().copied())
    }
}

/// Incremental construction of a [`LandmarkGraph`].
#[derive(Debug, Clone, Default)]
pub struct LandmarkGraphBuilder {
    graph: LandmarkGraph,
}

impl LandmarkGraphBuilder {
    /// Add a single-fact landmark.
    ///
    /// # Errors
    ///
    /// [`LandmarkGraphError::DuplicateFact`] if `fact` already has a simple landmark.
    pub fn add_simple(
        &mut self,
        fact: Fact,
        min_cost: i64,
        is_goal: bool,
    ) -> Result<LandmarkId, LandmarkGraphError> {
        if let Some(&existing) = self.graph.simple.get(&fact) {
            return Err(LandmarkGraphError::DuplicateFact { fact, existing });
        }
        let id = self.push(vec![fact], false, min_cost, is_goal);
        self.graph.simple.insert(fact, id);
        Ok(id)
    }

    /// Add a disjunctive landmark over `facts`.
    ///
    /// # Errors
    ///
    /// [`LandmarkGraphError::EmptyDisjunction`] for no facts;
    /// [`LandmarkGraphError::DuplicateFact`] if a fact is already covered by
    /// another disjunctive landmark.
    pub fn add_disjunctive(
        &mut self,
        facts: Vec<Fact>,
        min_cost: i64,
        is_goal: bool,
    ) -> Result<LandmarkId, LandmarkGraphError> {
        if facts.is_empty() {
            return Err(LandmarkGraphError::EmptyDisjunction);
        }
        for fact in &facts {
            if let Some(&existing) = self.graph.disjunctive.get(fact) {
                return Err(LandmarkGraphError::DuplicateFact {
                    fact: *fact,
                    existing,
                });
            }
        }
        let id = self.push(facts.clone(), true, min_cost, is_goal);
        for fact in facts {
            self.graph.disjunctive.insert(fact, id);
        }
        Ok(id)
    }

    /// Order `parent` before `child`. Re-adding an edge keeps the stronger type.
    ///
    /// # Errors
    ///
    /// [`LandmarkGraphError::UnknownNode`] or [`LandmarkGraphError::SelfEdge`].
    pub fn add_edge(
        &mut self,
        parent: LandmarkId,
        child: LandmarkId,
        edge: EdgeType,
    ) -> Result<(), LandmarkGraphError> {
        for id in [parent, child] {
            if id.0 >= self.graph.nodes.len() {
                return Err(LandmarkGraphError::UnknownNode { index: id.0 });
            }
        }
        if parent == child {
            return Err(LandmarkGraphError::SelfEdge { id: parent });
        }
        let stored = self.graph.nodes[child.0]
            .parents
            .entry(parent)
            .and_modify(|e| *e = (*e).max(edge))
            .or_insert(edge);
        let stored = *stored;
        self.graph.nodes[parent.0].children.insert(child, stored);
        Ok(())
    }

    /// Resolve a raw index against the nodes added so far.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<LandmarkId> {
        self.graph.id(index)
    }

    #[must_use]
    pub fn build(self) -> LandmarkGraph {
        self.graph
    }

    fn push(&mut self, facts: Vec<Fact>, disjunctive: bool, min_cost: i64, is_goal: bool) -> LandmarkId {
        let id = LandmarkId(self.graph.nodes.len());
        self.graph.nodes.push(LandmarkNode {
            id,
            facts,
            disjunctive,
            min_cost,
            is_goal,
            parents: BTreeMap::new(),
            children: BTreeMap::new(),
        });
        id
    }
}
