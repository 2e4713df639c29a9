//! JSON task documents.
//!
//! A self-contained description of variables, operators, landmarks, axiom
//! rules and metric flags, used for fixtures, benchmarks and diagnostics.
//! The initial state and successor generator keep their token encodings
//! (see [`crate::state::State::read_initial`] and
//! [`crate::successor::SuccessorGenerator::read`]).
//!
//! ```json
//! {
//!   "variables": [{"name": "at", "domain_size": 2}, {"name": "fuel", "domain_size": 1}],
//!   "operators": [{"name": "drive", "cost": 5,
//!                  "effects": [{"var": 0, "pre": 0, "post": 1},
//!                              {"var": 1, "post": -1, "kind": "decrease", "delta": 3.0}]}],
//!   "landmarks": {"nodes": [{"facts": [{"var": 0, "value": 1}], "min_cost": 1, "goal": true}],
//!                 "edges": []},
//!   "metric": {"action_cost_metric": true}
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::axioms::{AxiomRule, RuleAxiomEvaluator};
use crate::landmarks::graph::{EdgeType, LandmarkGraph, LandmarkGraphError};
use crate::task::context::{MetricConfig, TaskContext, TaskError};
use crate::task::operator::Operator;
use crate::task::variable::{Fact, Variable};

/// Top-level task document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDocumentV1 {
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub landmarks: Option<LandmarkDocumentV1>,
    #[serde(default)]
    pub axioms: Option<AxiomDocumentV1>,
    #[serde(default)]
    pub metric: MetricConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandmarkDocumentV1 {
    pub nodes: Vec<LandmarkNodeDocumentV1>,
    #[serde(default)]
    pub edges: Vec<LandmarkEdgeDocumentV1>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandmarkNodeDocumentV1 {
    pub facts: Vec<Fact>,
    #[serde(default)]
    pub disjunctive: bool,
    #[serde(default)]
    pub min_cost: i64,
    #[serde(default)]
    pub goal: bool,
}

/// Edge between node positions in `nodes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandmarkEdgeDocumentV1 {
    pub parent: usize,
    pub child: usize,
    pub kind: EdgeType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxiomDocumentV1 {
    pub defaults: Vec<Fact>,
    pub rules: Vec<AxiomRule>,
}

impl LandmarkDocumentV1 {
    /// # Errors
    ///
    /// [`TaskError::InvalidReference`] for a simple node without exactly one
    /// fact; [`TaskError::Landmarks`] for graph construction failures.
    pub fn into_graph(self) -> Result<LandmarkGraph, TaskError> {
        let mut builder = LandmarkGraph::builder();
        for (position, node) in self.nodes.into_iter().enumerate() {
            if node.disjunctive {
                builder.add_disjunctive(node.facts, node.min_cost, node.goal)?;
            } else {
                let [fact] = node.facts.as_slice() else {
                    return Err(TaskError::InvalidReference {
                        detail: format!(
                            "landmark node {position}: simple landmark needs exactly one fact, got {}",
                            node.facts.len()
                        ),
                    });
                };
                builder.add_simple(*fact, node.min_cost, node.goal)?;
            }
        }
        for edge in self.edges {
            let parent = builder
                .id(edge.parent)
                .ok_or(LandmarkGraphError::UnknownNode { index: edge.parent })?;
            let child = builder
                .id(edge.child)
                .ok_or(LandmarkGraphError::UnknownNode { index: edge.child })?;
            builder.add_edge(parent, child, edge.kind)?;
        }
        Ok(builder.build())
    }
}

impl TaskDocumentV1 {
    /// Build and validate the task this document describes.
    ///
    /// # Errors
    ///
    /// See [`LandmarkDocumentV1::into_graph`] and
    /// [`crate::task::TaskContextBuilder::build`].
    pub fn into_context(self) -> Result<TaskContext, TaskError> {
        let mut builder = TaskContext::builder(self.variables, self.operators).metric(self.metric);
        if let Some(landmarks) = self.landmarks {
            builder = builder.landmarks(landmarks.into_graph()?);
        }
        if let Some(axioms) = self.axioms {
            builder = builder.axioms(RuleAxiomEvaluator::new(axioms.defaults, axioms.rules));
        }
        builder.build()
    }
}

impl TaskContext {
    /// Parse a [`TaskDocumentV1`] and build its context.
    ///
    /// # Errors
    ///
    /// [`TaskError::Json`] for malformed documents, otherwise as
    /// [`TaskDocumentV1::into_context`].
    pub fn from_json_str(text: &str) -> Result<Self, TaskError> {
        let document: TaskDocumentV1 = serde_json::from_str(text)?;
        document.into_context()
    }

    /// Read a [`TaskDocumentV1`] from disk and build its context.
    ///
    /// # Errors
    ///
    /// [`TaskError::Io`] when the file cannot be read, otherwise as
    /// [`TaskContext::from_json_str`].
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, TaskError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TaskError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
