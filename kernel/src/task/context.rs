//! `TaskContext`: the immutable, shared description of one planning task.
//!
//! Built once through [`TaskContextBuilder`], which validates every variable
//! reference, then passed by `&` into state construction and successor
//! generation. Nothing in the kernel mutates it afterwards.

use serde::Deserialize;

use crate::arith::{ArithmeticEvaluator, PestEvaluator};
use crate::axioms::{AxiomEvaluator, NoAxioms};
use crate::landmarks::graph::{LandmarkGraph, LandmarkGraphError};
use crate::task::operator::{EffectKind, Operator, OperatorId, PrePost};
use crate::task::variable::{Fact, Variable, NUMERIC_SENTINEL};

/// Cost added per transition under the plan-length metric.
pub const PLAN_LENGTH_STEP_COST: f64 = 2.0;

/// Offset baked into every upstream action cost when an explicit
/// action-cost metric is in use.
pub const ACTION_COST_OFFSET: f64 = 1.0;

/// Run-mode flags that govern path-cost accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct MetricConfig {
    /// Every transition costs [`PLAN_LENGTH_STEP_COST`], whatever the operator declares.
    #[serde(default)]
    pub length_metric: bool,
    /// Upstream costs are pre-incremented by [`ACTION_COST_OFFSET`] so that
    /// zero-cost actions stay distinguishable; the offset is removed from
    /// every transition.
    #[serde(default)]
    pub action_cost_metric: bool,
}

impl MetricConfig {
    /// Remove the action-cost offset from a raw per-transition cost.
    #[must_use]
    pub fn correct(self, raw_step_cost: f64) -> f64 {
        if self.action_cost_metric {
            raw_step_cost - ACTION_COST_OFFSET
        } else {
            raw_step_cost
        }
    }
}

/// Typed failure while assembling a task.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read task document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid reference: {detail}")]
    InvalidReference { detail: String },
    #[error(transparent)]
    Landmarks(#[from] LandmarkGraphError),
}

/// The shared task description.
#[derive(Debug)]
pub struct TaskContext {
    variables: Vec<Variable>,
    operators: Vec<Operator>,
    landmarks: Option<LandmarkGraph>,
    axioms: Box<dyn AxiomEvaluator>,
    arithmetic: Box<dyn ArithmeticEvaluator>,
    metric: MetricConfig,
}

impl TaskContext {
    /// Start a task over the given variables and operators.
    ///
    /// Defaults: no landmark graph, [`NoAxioms`], [`PestEvaluator`],
    /// [`MetricConfig::default`].
    #[must_use]
    pub fn builder(variables: Vec<Variable>, operators: Vec<Operator>) -> TaskContextBuilder {
        TaskContextBuilder {
            variables,
            operators,
            landmarks: None,
            axioms: Box::new(NoAxioms),
            arithmetic: Box::new(PestEvaluator::new()),
            metric: MetricConfig::default(),
        }
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Variable by index. Panics when out of range.
    #[must_use]
    pub fn variable(&self, var: usize) -> &Variable {
        &self.variables[var]
    }

    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Operator by id. Ids handed out by this context are always in range.
    #[must_use]
    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id.index()]
    }

    /// Resolve a raw operator index.
    #[must_use]
    pub fn operator_id(&self, index: usize) -> Option<OperatorId> {
        (index < self.operators.len()).then(|| OperatorId::new(index))
    }

    /// `None` when landmarks are disabled.
    #[must_use]
    pub fn landmarks(&self) -> Option<&LandmarkGraph> {
        self.landmarks.as_ref()
    }

    #[must_use]
    pub fn axioms(&self) -> &dyn AxiomEvaluator {
        self.axioms.as_ref()
    }

    #[must_use]
    pub fn arithmetic(&self) -> &dyn ArithmeticEvaluator {
        self.arithmetic.as_ref()
    }

    #[must_use]
    pub const fn metric(&self) -> MetricConfig {
        self.metric
    }
}

/// Builder for [`TaskContext`].
#[derive(Debug)]
pub struct TaskContextBuilder {
    variables: Vec<Variable>,
    operators: Vec<Operator>,
    landmarks: Option<LandmarkGraph>,
    axioms: Box<dyn AxiomEvaluator>,
    arithmetic: Box<dyn ArithmeticEvaluator>,
    metric: MetricConfig,
}

impl TaskContextBuilder {
    #[must_use]
    pub fn landmarks(mut self, graph: LandmarkGraph) -> Self {
        self.landmarks = Some(graph);
        self
    }

    #[must_use]
    pub fn axioms(mut self, evaluator: impl AxiomEvaluator + 'static) -> Self {
        self.axioms = Box::new(evaluator);
        self
    }

    #[must_use]
    pub fn arithmetic(mut self, evaluator: impl ArithmeticEvaluator + 'static) -> Self {
        self.arithmetic = Box::new(evaluator);
        self
    }

    #[must_use]
    pub fn metric(mut self, metric: MetricConfig) -> Self {
        self.metric = metric;
        self
    }

    /// Validate every variable reference and value, then freeze the task.
    ///
    /// Values in prevails, preconditions, effect conditions and discrete
    /// posts must lie in the variable's domain or be [`NUMERIC_SENTINEL`].
    /// Numeric effects must write [`NUMERIC_SENTINEL`] to the discrete slot.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidReference`] when an operator or landmark names a
    /// variable that does not exist, or an operator uses a value its
    /// variable cannot hold.
    pub fn build(self) -> Result<TaskContext, TaskError> {
        let variables = &self.variables;
        for op in &self.operators {
            for fact in &op.prevail {
                check_fact(variables, fact, || format!("prevail of operator '{}'", op.name))?;
            }
            for pre_post in &op.pre_post {
                let site = || format!("effect of operator '{}'", op.name);
                check_var(variables.len(), pre_post.var, site)?;
                if let Some(pre) = pre_post.pre {
                    check_fact(variables, &Fact::new(pre_post.var, pre), site)?;
                }
                check_post(variables, pre_post, site)?;
                for condition in &pre_post.conditions {
                    check_fact(variables, condition, || {
                        format!("effect condition of operator '{}'", op.name)
                    })?;
                }
            }
        }
        if let Some(graph) = &self.landmarks {
            for fact in graph.facts() {
                check_fact(variables, &fact, || "landmark".to_string())?;
            }
        }
        tracing::debug!(
            variables = self.variables.len(),
            operators = self.operators.len(),
            landmarks = self.landmarks.as_ref().map_or(0, LandmarkGraph::len),
            "task context built"
        );
        Ok(TaskContext {
            variables: self.variables,
            operators: self.operators,
            landmarks: self.landmarks,
            axioms: self.axioms,
            arithmetic: self.arithmetic,
            metric: self.metric,
        })
    }
}

fn check_fact(variables: &[Variable], fact: &Fact, site: impl Fn() -> String) -> Result<(), TaskError> {
    check_var(variables.len(), fact.var, &site)?;
    let domain_size = variables[fact.var].domain_size;
    if fact.value == NUMERIC_SENTINEL || in_domain(fact.value, domain_size) {
        Ok(())
    } else {
        Err(TaskError::InvalidReference {
            detail: format!(
                "{}: value {} outside the domain of variable {} (size {domain_size})",
                site(),
                fact.value,
                fact.var
            ),
        })
    }
}

fn check_post(variables: &[Variable], pre_post: &PrePost, site: impl Fn() -> String) -> Result<(), TaskError> {
    match pre_post.kind {
        EffectKind::Structural { .. } => Ok(()),
        EffectKind::Discrete => check_fact(variables, &Fact::new(pre_post.var, pre_post.post), site),
        EffectKind::Increase | EffectKind::Decrease | EffectKind::Assign => {
            if pre_post.post == NUMERIC_SENTINEL {
                Ok(())
            } else {
                Err(TaskError::InvalidReference {
                    detail: format!(
                        "{}: numeric effect on variable {} must post {NUMERIC_SENTINEL}, got {}",
                        site(),
                        pre_post.var,
                        pre_post.post
                    ),
                })
            }
        }
    }
}

fn in_domain(value: i32, domain_size: usize) -> bool {
    usize::try_from(value).is_ok_and(|v| v < domain_size)
}

fn check_var(count: usize, var: usize, site: impl FnOnce() -> String) -> Result<(), TaskError> {
    if var < count {
        Ok(())
    } else {
        Err(TaskError::InvalidReference {
            detail: format!("{}: variable {var} out of range ({count} variables)", site()),
        })
    }
}
