// src/dag/task_info.rs

//! Resolved recipes ready for dispatch, and their per-invocation state.

use crate::definition::RecipeName;
use crate::environment::Environment;

/// Per-invocation state of a recipe.
///
/// `Pending → Running → {Succeeded, Failed}`; terminal on first failure,
/// no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Planned, waiting for earlier recipes in the chain.
    Pending,
    /// Handed to the dispatcher.
    Running,
    /// Every command line exited successfully.
    Succeeded,
    /// A command line failed, or an earlier recipe in the chain did.
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed)
    }
}

/// A fully rendered command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledLine {
    /// Command text with every placeholder substituted.
    pub command: String,
    /// Echo the command to stderr before running it.
    pub echo: bool,
    /// `-` prefix: a non-zero exit does not fail the recipe.
    pub ignore_errors: bool,
}

/// Description of a recipe the runtime should execute.
#[derive(Debug, Clone)]
pub struct ScheduledRecipe {
    pub name: RecipeName,
    pub lines: Vec<ScheduledLine>,
    /// Base environment plus this recipe's exports.
    pub environment: Environment,
}
