//! Synthetic tasks for the lamina benchmark suites.
//!
//! `n` binary variables `bit0..bitN` plus one numeric `budget`. Each bit
//! has a `set` operator (literal cost, spends one unit of budget) and a
//! `reset` operator (runtime cost and delta). The successor generator
//! switches on every bit in turn, chaining through the default branch, and
//! the landmark graph is the chain `bit0=1 -> bit1=1 -> ... -> bitN=1`
//! with the last node a goal.

#![forbid(unsafe_code)]

use lamina_kernel::landmarks::{EdgeType, LandmarkGraph};
use lamina_kernel::state::State;
use lamina_kernel::successor::{SuccessorGenerator, SwitchNode};
use lamina_kernel::task::{
    EffectKind, Fact, Operator, OperatorCost, PrePost, TaskContext, Variable, UNUSED_NUMERIC,
};

/// Operator index of `set{i}`.
#[must_use]
pub const fn set_op(i: usize) -> usize {
    2 * i
}

/// Operator index of `reset{i}`.
#[must_use]
pub const fn reset_op(i: usize) -> usize {
    2 * i + 1
}

/// Build the task over `bits` binary variables.
///
/// # Panics
///
/// Panics if the generated task is invalid (a bug in this builder).
#[must_use]
pub fn synthetic_task(bits: usize) -> TaskContext {
    let budget = bits;
    let mut variables: Vec<Variable> = (0..bits).map(|i| Variable::new(format!("bit{i}"), 2)).collect();
    variables.push(Variable::new("budget", 1));

    let mut operators = Vec::with_capacity(2 * bits);
    for i in 0..bits {
        operators.push(
            Operator::new(format!("set{i}"), OperatorCost::Literal(1.0))
                .with_effect(PrePost::assign(i, Some(0), 1))
                .with_effect(PrePost::numeric(budget, EffectKind::Decrease, 1.0)),
        );
        operators.push(
            Operator::new(format!("reset{i}"), OperatorCost::Runtime(format!("1 + :{budget}: / 100")))
                .with_effect(PrePost::assign(i, Some(1), 0))
                .with_effect(PrePost::numeric(budget, EffectKind::Increase, 0.0).with_runtime_delta("2 - 1")),
        );
    }

    let mut landmarks = LandmarkGraph::builder();
    let mut previous = None;
    for i in 0..bits {
        let id = landmarks
            .add_simple(Fact::new(i, 1), 1, i + 1 == bits)
            .expect("one landmark per fact");
        if let Some(parent) = previous {
            landmarks.add_edge(parent, id, EdgeType::Natural).expect("chain edge");
        }
        previous = Some(id);
    }

    TaskContext::builder(variables, operators)
        .landmarks(landmarks.build())
        .build()
        .expect("synthetic task is valid")
}

/// Switch on every bit, chained through the default branch.
#[must_use]
pub fn synthetic_generator(ctx: &TaskContext) -> SuccessorGenerator {
    let bits = ctx.variable_count() - 1;
    let op = |index| ctx.operator_id(index).into_iter().collect::<Vec<_>>();
    (0..bits)
        .rev()
        .fold(SuccessorGenerator::Leaf(Vec::new()), |rest, i| {
            SuccessorGenerator::Switch(Box::new(SwitchNode {
                var: i,
                immediate: SuccessorGenerator::Leaf(Vec::new()),
                by_value: vec![
                    SuccessorGenerator::Leaf(op(set_op(i))),
                    SuccessorGenerator::Leaf(op(reset_op(i))),
                ],
                default: rest,
            }))
        })
}

/// All bits clear, `budget` units of budget.
///
/// # Panics
///
/// Panics if `ctx` was not built by [`synthetic_task`].
#[must_use]
pub fn synthetic_initial(ctx: &TaskContext, budget: f64) -> State {
    let bits = ctx.variable_count() - 1;
    let mut vars = vec![0; bits];
    vars.push(-1);
    let mut numeric = vec![UNUSED_NUMERIC; bits];
    numeric.push(budget);
    State::from_values(ctx, vars, numeric).expect("synthetic initial state is valid")
}
