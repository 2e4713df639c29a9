//! Shared fixture helpers for the scenario tests and the `dump_fixture`
//! binary.
//!
//! The committed fixture is a one-truck, one-package delivery task with a
//! numeric fuel variable, a runtime-cost refuel action, a derived
//! `delivered` variable and a five-node landmark graph.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use lamina_kernel::state::State;
use lamina_kernel::successor::SuccessorGenerator;
use lamina_kernel::task::{Operator, OperatorId, TaskContext, TaskDocumentV1, TokenReader};

/// Directory holding the committed fixtures.
#[must_use]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
}

/// Path of a committed fixture file.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Read a committed fixture as text.
///
/// # Panics
///
/// Panics if the file is missing. Fixtures are part of the crate.
#[must_use]
pub fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// The delivery task document, for tests that tweak it before building.
///
/// # Panics
///
/// Panics if the committed document does not parse.
#[must_use]
pub fn delivery_document() -> TaskDocumentV1 {
    serde_json::from_str(&read_fixture("delivery.json")).expect("delivery.json parses")
}

/// The delivery task as committed.
///
/// # Panics
///
/// Panics if the committed document is invalid.
#[must_use]
pub fn delivery_task() -> TaskContext {
    delivery_document().into_context().expect("delivery.json is a valid task")
}

/// The delivery task's initial state.
///
/// # Panics
///
/// Panics if `delivery.state` does not match the task.
#[must_use]
pub fn delivery_initial(ctx: &TaskContext) -> State {
    let text = read_fixture("delivery.state");
    State::read_initial(ctx, &mut TokenReader::new(&text)).expect("delivery.state is valid")
}

/// The delivery task's successor generator.
///
/// # Panics
///
/// Panics if `delivery.sg` does not match the task.
#[must_use]
pub fn delivery_generator(ctx: &TaskContext) -> SuccessorGenerator {
    let text = read_fixture("delivery.sg");
    SuccessorGenerator::read(&mut TokenReader::new(&text), ctx).expect("delivery.sg is valid")
}

/// Operator id by name.
///
/// # Panics
///
/// Panics if no operator has that name.
#[must_use]
pub fn op_id(ctx: &TaskContext, name: &str) -> OperatorId {
    ctx.operators()
        .iter()
        .position(|op| op.name == name)
        .and_then(|index| ctx.operator_id(index))
        .unwrap_or_else(|| panic!("no operator named '{name}'"))
}

/// Operator by name.
///
/// # Panics
///
/// Panics if no operator has that name.
#[must_use]
pub fn op<'a>(ctx: &'a TaskContext, name: &str) -> &'a Operator {
    ctx.operator(op_id(ctx, name))
}

/// Apply a sequence of operators by name, checking each is offered by the
/// successor generator first.
///
/// # Panics
///
/// Panics if an operator is not applicable or the transition fails.
#[must_use]
pub fn run_plan(ctx: &TaskContext, generator: &SuccessorGenerator, start: &State, plan: &[&str]) -> State {
    let mut state = start.clone();
    for name in plan {
        let id = op_id(ctx, name);
        assert!(
            generator.generate_applicable_ops(ctx, &state).contains(&id),
            "'{name}' is not applicable in\n{}",
            state.dump(ctx)
        );
        state = State::successor(ctx, &state, ctx.operator(id))
            .unwrap_or_else(|e| panic!("'{name}' failed: {e}"));
    }
    state
}

/// Operator names, for readable assertions.
#[must_use]
pub fn names(ctx: &TaskContext, ops: &[OperatorId]) -> Vec<String> {
    ops.iter().map(|&id| ctx.operator(id).name.clone()).collect()
}
