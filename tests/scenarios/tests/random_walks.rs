//! Property tests: random walks through the delivery task driven by the
//! successor generator.
//!
//! Along every walk:
//! - g never decreases and each state's reached set contains its parent's;
//! - reached sets stay closed under parents and their cost matches the
//!   summed node costs;
//! - every generated operator is discretely applicable and numerically
//!   feasible, so fuel never goes negative;
//! - the derived `delivered` variable tracks the package position.

use proptest::prelude::*;

use lamina_kernel::landmarks::landmark_is_leaf;
use lamina_kernel::state::State;
use lamina_kernel::task::TaskContext;
use lamina_scenarios::{delivery_generator, delivery_initial, delivery_task};

fn check_landmarks(ctx: &TaskContext, state: &State) -> Result<(), TestCaseError> {
    let graph = ctx.landmarks().expect("delivery task carries landmarks");
    let (reached, cost) = state.partial_plan();
    let mut summed = 0;
    for &id in reached {
        let node = graph.node(id);
        prop_assert!(landmark_is_leaf(node, reached), "{} reached before a parent", id);
        summed += node.min_cost;
    }
    prop_assert_eq!(summed, cost);
    Ok(())
}

proptest! {
    #[test]
    fn walks_preserve_invariants(choices in prop::collection::vec(any::<prop::sample::Index>(), 0..24)) {
        let ctx = delivery_task();
        let sg = delivery_generator(&ctx);
        let mut state = delivery_initial(&ctx);
        check_landmarks(&ctx, &state)?;

        for choice in choices {
            let ops = sg.generate_applicable_ops(&ctx, &state);
            prop_assert!(!ops.is_empty(), "refuel or a drive is always offered");
            for &id in &ops {
                let op = ctx.operator(id);
                prop_assert!(op.is_applicable(state.vars()));
                prop_assert!(op.is_numerically_feasible(state.numeric_values()));
            }

            let op = ctx.operator(ops[choice.index(ops.len())]);
            let next = State::successor(&ctx, &state, op).unwrap();

            prop_assert!(next.g_value() >= state.g_value() + 1.0 - 1e-9);
            prop_assert!(next.landmarks().reached().is_superset(state.landmarks().reached()));
            prop_assert!(next.numeric_value(2) >= 0.0);
            prop_assert_eq!(next[3] == 1, next[1] == 2);
            check_landmarks(&ctx, &next)?;
            state = next;
        }
    }
}
