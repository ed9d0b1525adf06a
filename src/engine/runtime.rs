// src/engine/runtime.rs

use std::fmt;

use tracing::{debug, info, warn};

use crate::dag::{ScheduledRecipe, Scheduler};
use crate::errors::{Result, RundagError};
use crate::exec::{CommandBackend, LineOutcome, LineRequest};

use super::{RecipeOutcome, RunOptions};

/// Walks a planned [`Scheduler`] and delegates each command line to a
/// [`CommandBackend`].
///
/// Recipes run strictly one after another. The first failing line ends the
/// run; its error carries the exit code the binary should return.
pub struct Runtime<E: CommandBackend> {
    scheduler: Scheduler,
    backend: E,
    options: RunOptions,
}

impl<E: CommandBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: CommandBackend> Runtime<E> {
    pub fn new(scheduler: Scheduler, backend: E, options: RunOptions) -> Self {
        Self {
            scheduler,
            backend,
            options,
        }
    }

    /// Run every planned recipe in order.
    pub async fn run(mut self) -> Result<()> {
        info!(
            order = ?self.scheduler.order(),
            dry_run = self.options.dry_run,
            "runtime started"
        );

        while let Some(recipe) = self.scheduler.next_ready() {
            match self.run_recipe(&recipe).await {
                Ok(()) => {
                    debug!(recipe = %recipe.name, "recipe succeeded");
                    self.scheduler
                        .handle_completion(&recipe.name, RecipeOutcome::Success);
                }
                Err(err) => {
                    let outcome = RecipeOutcome::Failed(err.exit_code());
                    self.scheduler.handle_completion(&recipe.name, outcome);
                    return Err(err);
                }
            }
        }

        info!("runtime finished");
        Ok(())
    }

    async fn run_recipe(&mut self, recipe: &ScheduledRecipe) -> Result<()> {
        info!(recipe = %recipe.name, lines = recipe.lines.len(), "running recipe");

        for line in &recipe.lines {
            if line.echo || self.options.dry_run {
                eprintln!("{}", line.command);
            }
            if self.options.dry_run {
                continue;
            }

            let request = LineRequest {
                recipe: recipe.name.clone(),
                command: line.command.clone(),
                environment: recipe.environment.clone(),
            };
            match self.backend.run_line(request).await? {
                LineOutcome::Success => {}
                LineOutcome::Failed(code) if line.ignore_errors => {
                    warn!(
                        recipe = %recipe.name,
                        code,
                        command = %line.command,
                        "ignoring failed line"
                    );
                }
                LineOutcome::Failed(code) => {
                    return Err(RundagError::CommandFailure {
                        recipe: recipe.name.clone(),
                        line: line.command.clone(),
                        code,
                    });
                }
                LineOutcome::Interrupted => {
                    return Err(RundagError::Interrupted {
                        recipe: recipe.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
