// src/dag/mod.rs

//! Prerequisite graph and run planning.
//!
//! - [`graph`] holds adjacency for the recipe dependency graph and its
//!   depth-first linearisation.
//! - [`scheduler`] selects the target recipe, resolves the whole plan up
//!   front and tracks per-recipe run state.
//! - [`task_info`] provides the planned recipe and line types.

pub mod graph;
pub mod scheduler;
pub mod task_info;

pub use graph::DagGraph;
pub use scheduler::{select_recipe, Scheduler};
pub use task_info::{RunState, ScheduledLine, ScheduledRecipe};
