//! Successor construction and re-parenting.
//!
//! Order inside [`State::successor`]:
//! 1. copy the predecessor;
//! 2. apply every firing effect in declaration order (conditions are read
//!    from the predecessor, runtime deltas from the successor as updated so
//!    far);
//! 3. run the axiom evaluator;
//! 4. extend landmark progress from the predecessor's;
//! 5. charge the step cost, computed against the predecessor.

use crate::arith::ArithError;
use crate::state::runtime;
use crate::state::State;
use crate::task::context::{ACTION_COST_OFFSET, PLAN_LENGTH_STEP_COST};
use crate::task::{EffectKind, Operator, OperatorCost, PrePost, TaskContext};

/// Typed failure while building a successor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// A runtime cost or delta the evaluator rejected.
    #[error("cannot evaluate runtime expression '{expression}': {source}")]
    Expression {
        expression: String,
        #[source]
        source: ArithError,
    },
    /// A `:<index>:` reference that names no numeric variable.
    #[error("unresolved variable reference '{reference}' in runtime expression '{expression}'")]
    UnresolvedReference { expression: String, reference: String },
}

impl State {
    /// Apply `op` to `predecessor`.
    ///
    /// The operator's applicability is the caller's concern (the successor
    /// generator); this only executes its effects.
    ///
    /// # Errors
    ///
    /// [`TransitionError`] when a runtime delta or cost cannot be evaluated.
    ///
    /// # Panics
    ///
    /// When `op` is an axiom. Axioms only ever run through the task's
    /// axiom evaluator.
    pub fn successor(ctx: &TaskContext, predecessor: &Self, op: &Operator) -> Result<Self, TransitionError> {
        assert!(!op.is_axiom, "axiom '{}' applied as a transition", op.name);
        let mut next = predecessor.clone();
        for pre_post in &op.pre_post {
            if pre_post.does_fire(&predecessor.vars) {
                next.apply_effect(ctx, pre_post)?;
            }
        }
        ctx.axioms().evaluate(&mut next.vars, &mut next.numeric);
        next.landmarks.update(ctx.landmarks(), op, &next.vars);
        next.g_value = predecessor.g_value + step_cost(ctx, predecessor, op)?;
        tracing::trace!(op = %op.name, g = next.g_value, "successor built");
        Ok(next)
    }

    /// Re-parent this state under `new_predecessor` reached through `op`.
    ///
    /// Landmark progress is recomputed from the new predecessor's and the
    /// g-value is the new predecessor's plus the step cost. The value
    /// vectors are untouched. On error nothing changes.
    ///
    /// # Errors
    ///
    /// [`TransitionError`] when a runtime cost cannot be evaluated.
    ///
    /// # Panics
    ///
    /// When `op` is an axiom.
    pub fn change_ancestor(
        &mut self,
        ctx: &TaskContext,
        new_predecessor: &Self,
        op: &Operator,
    ) -> Result<(), TransitionError> {
        assert!(!op.is_axiom, "axiom '{}' used as a parent edge", op.name);
        let g_value = new_predecessor.g_value + step_cost(ctx, new_predecessor, op)?;
        let mut landmarks = new_predecessor.landmarks.clone();
        landmarks.update(ctx.landmarks(), op, &self.vars);
        tracing::debug!(op = %op.name, old_g = self.g_value, new_g = g_value, "ancestor changed");
        self.landmarks = landmarks;
        self.g_value = g_value;
        Ok(())
    }

    fn apply_effect(&mut self, ctx: &TaskContext, pre_post: &PrePost) -> Result<(), TransitionError> {
        let var = pre_post.var;
        match pre_post.kind {
            EffectKind::Discrete => self.vars[var] = pre_post.post,
            EffectKind::Structural { .. } => {}
            EffectKind::Increase | EffectKind::Decrease | EffectKind::Assign => {
                let delta = match &pre_post.runtime_delta {
                    Some(expression) => runtime::evaluate(ctx, expression, &self.numeric)?,
                    None => pre_post.delta,
                };
                self.vars[var] = pre_post.post;
                let slot = &mut self.numeric[var];
                match pre_post.kind {
                    EffectKind::Increase => *slot += delta,
                    EffectKind::Decrease => *slot -= delta,
                    _ => *slot = delta,
                }
            }
        }
        Ok(())
    }
}

/// Path-cost increment for `op` taken from `predecessor`, after the metric
/// correction.
///
/// Plan-length metric: a flat [`PLAN_LENGTH_STEP_COST`]. Otherwise the
/// literal cost, or the runtime cost plus [`ACTION_COST_OFFSET`] (runtime
/// costs arrive without the upstream offset).
///
/// # Errors
///
/// [`TransitionError`] when a runtime cost cannot be evaluated.
pub fn step_cost(ctx: &TaskContext, predecessor: &State, op: &Operator) -> Result<f64, TransitionError> {
    let metric = ctx.metric();
    let raw = if metric.length_metric {
        PLAN_LENGTH_STEP_COST
    } else {
        match &op.cost {
            OperatorCost::Literal(cost) => *cost,
            OperatorCost::Runtime(expression) => {
                runtime::evaluate(ctx, expression, &predecessor.numeric)? + ACTION_COST_OFFSET
            }
        }
    };
    Ok(metric.correct(raw))
}
