// src/engine/mod.rs

//! Run orchestration.
//!
//! The [`Scheduler`](crate::dag::Scheduler) decides what runs next; the
//! [`Runtime`] in [`runtime`] walks the plan and hands every rendered
//! command line to a [`CommandBackend`](crate::exec::CommandBackend).

/// Outcome of a whole recipe, as reported to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOutcome {
    Success,
    Failed(i32),
}

/// Options shared by planning and the runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print rendered lines instead of running them.
    pub dry_run: bool,
    /// Suppress command echo for every recipe (`--quiet`).
    pub quiet: bool,
}

pub mod runtime;

pub use runtime::Runtime;
