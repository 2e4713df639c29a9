//! Landmark progression over the delivery fixture.
//!
//! Graph (node index: fact, cost):
//! - 0: package at depot (1) --natural--> 1: package in truck (1)
//! - 1 --goal-necessary--> 3: package at site (1, goal)
//! - 4: truck at depot (0) --natural--> 2: truck at site (3)
//! - 2 --goal-necessary--> 3

use std::collections::BTreeSet;

use lamina_kernel::landmarks::{landmark_is_leaf, LandmarkGraph, LandmarkId};
use lamina_kernel::state::State;
use lamina_kernel::task::{TaskContext, UNUSED_NUMERIC};
use lamina_scenarios::{delivery_document, delivery_generator, delivery_initial, delivery_task, op, run_plan};

fn graph(ctx: &TaskContext) -> &LandmarkGraph {
    ctx.landmarks().expect("delivery task carries landmarks")
}

fn ids(ctx: &TaskContext, indices: &[usize]) -> BTreeSet<LandmarkId> {
    indices.iter().map(|&i| graph(ctx).id(i).unwrap()).collect()
}

#[test]
fn initial_state_seeds_parentless_landmarks() {
    let ctx = delivery_task();
    let s0 = delivery_initial(&ctx);
    let (reached, cost) = s0.partial_plan();
    assert_eq!(reached, &ids(&ctx, &[0, 4]));
    assert_eq!(cost, 1);
}

#[test]
fn landmarks_accumulate_along_the_plan() {
    let ctx = delivery_task();
    let sg = delivery_generator(&ctx);
    let s0 = delivery_initial(&ctx);

    let s1 = run_plan(&ctx, &sg, &s0, &["load"]);
    assert_eq!(s1.partial_plan(), (&ids(&ctx, &[0, 1, 4]), 2));

    let s2 = run_plan(&ctx, &sg, &s1, &["drive_to_site"]);
    assert_eq!(s2.partial_plan(), (&ids(&ctx, &[0, 1, 2, 4]), 5));

    let s3 = run_plan(&ctx, &sg, &s2, &["unload"]);
    assert_eq!(s3.partial_plan(), (&ids(&ctx, &[0, 1, 2, 3, 4]), 6));
    assert!(s3.needed_landmarks(&ctx).landmarks.is_empty());
}

#[test]
fn goal_landmark_waits_for_all_parents() {
    let ctx = delivery_task();
    // Teleport the package to the site without the truck ever leaving.
    let s0 = State::from_values(&ctx, vec![0, 1, -1, 0], vec![UNUSED_NUMERIC, UNUSED_NUMERIC, 10.0, UNUSED_NUMERIC])
        .unwrap();
    let mut skip = op(&ctx, "unload").clone();
    skip.prevail.clear();
    let s1 = State::successor(&ctx, &s0, &skip).unwrap();
    assert_eq!(s1[1], 2);
    let goal = graph(&ctx).id(3).unwrap();
    assert!(!s1.landmarks().is_reached(goal), "truck-at-site parent not reached");
}

#[test]
fn leaving_before_delivery_makes_landmark_needed_again() {
    let ctx = delivery_task();
    let sg = delivery_generator(&ctx);
    let s0 = delivery_initial(&ctx);
    let back = run_plan(&ctx, &sg, &s0, &["load", "drive_to_site", "drive_to_depot"]);

    let needed = back.needed_landmarks(&ctx);
    assert_eq!(needed.landmarks, ids(&ctx, &[2]));
    assert_eq!(needed.cost, 3);
    // Reached landmarks are never removed.
    assert_eq!(back.partial_plan().1, 5);
}

#[test]
fn reached_sets_stay_closed_under_parents() {
    let ctx = delivery_task();
    let sg = delivery_generator(&ctx);
    let s0 = delivery_initial(&ctx);
    let mut state = s0.clone();
    for name in ["load", "drive_to_site", "drive_to_depot", "refuel", "drive_to_site", "unload"] {
        state = run_plan(&ctx, &sg, &state, &[name]);
        let reached = state.landmarks().reached();
        for &id in reached {
            assert!(landmark_is_leaf(graph(&ctx).node(id), reached), "{id} after {name}");
        }
    }
    assert_eq!(state.partial_plan().1, 6);
}

#[test]
fn task_without_landmarks_keeps_empty_bookkeeping() {
    let mut doc = delivery_document();
    doc.landmarks = None;
    let ctx = doc.into_context().unwrap();
    let sg = delivery_generator(&ctx);
    let s0 = delivery_initial(&ctx);
    let s3 = run_plan(&ctx, &sg, &s0, &["load", "drive_to_site", "unload"]);
    assert!(s3.partial_plan().0.is_empty());
    assert_eq!(s3.partial_plan().1, 0);
    assert!(s3.needed_landmarks(&ctx).landmarks.is_empty());
}
