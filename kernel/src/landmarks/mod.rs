//! Landmarks: the shared graph and the per-state progression bookkeeping.
//!
//! Depends on `task` for facts and operators.

pub mod graph;
pub mod progress;

pub use graph::{EdgeType, LandmarkGraph, LandmarkGraphBuilder, LandmarkGraphError, LandmarkId, LandmarkNode};
pub use progress::{landmark_is_leaf, LandmarkProgress, NeededLandmarks};
