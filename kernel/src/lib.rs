//! Lamina Kernel: state transitions, landmark progression and successor
//! generation for a numeric heuristic planner.
//!
//! # API Surface
//!
//! - [`state::State::read_initial`] -- decode the initial state
//! - [`state::State::successor`] -- apply an operator, producing a new state
//! - [`state::State::change_ancestor`] -- re-parent a state on a cheaper path
//! - [`successor::SuccessorGenerator::generate_applicable_ops`] -- applicable
//!   operators in a state
//!
//! Everything is interpreted against one immutable [`task::TaskContext`].
//!
//! # Module Dependency Direction
//!
//! `arith`, `axioms` ← `task` ← `landmarks` ← `state` ← `successor`
//!
//! One-way only. `landmarks::graph` is the one exception used by `task`
//! for validation; `task` never depends on `state`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arith;
pub mod axioms;
pub mod hash;
pub mod landmarks;
pub mod state;
pub mod successor;
pub mod task;
