// src/exec/backend.rs

//! Pluggable command backend abstraction.

use std::future::Future;
use std::pin::Pin;

use crate::definition::RecipeName;
use crate::environment::Environment;
use crate::errors::Result;

/// One rendered command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub recipe: RecipeName,
    pub command: String,
    /// Complete environment for the child; nothing is inherited beyond it.
    pub environment: Environment,
}

/// How a single command line ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Success,
    /// Non-zero exit, or `128 + signal` when killed by a signal.
    Failed(i32),
    /// Ctrl-C arrived while the line was running; the child was killed.
    Interrupted,
}

/// Trait abstracting how command lines are executed.
///
/// Production code uses [`ShellBackend`](super::ShellBackend); tests can
/// provide an implementation that records requests without spawning
/// processes.
pub trait CommandBackend: Send {
    /// Run `request` to completion.
    ///
    /// `Err` is reserved for failures to run at all (e.g. the shell could
    /// not be spawned); a command that ran and failed is
    /// `Ok(LineOutcome::Failed(_))`.
    fn run_line(
        &mut self,
        request: LineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<LineOutcome>> + Send + '_>>;
}
