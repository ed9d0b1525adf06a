// src/exec/command.rs

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use anyhow::anyhow;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, RundagError};

use super::backend::{CommandBackend, LineOutcome, LineRequest};
use super::interrupt::InterruptFlag;

/// Runs each line as `<shell...> <line>` in `working_dir`.
///
/// Standard streams are inherited, so recipe output reaches the terminal
/// unmodified. A Ctrl-C seen at any point of the run makes the current line,
/// and any line after it, report [`LineOutcome::Interrupted`].
#[derive(Debug, Clone)]
pub struct ShellBackend {
    shell: Vec<String>,
    working_dir: PathBuf,
    interrupt: InterruptFlag,
}

impl ShellBackend {
    /// Backend listening for SIGINT on the current process.
    pub fn new(shell: Vec<String>, working_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_interrupt(shell, working_dir, InterruptFlag::listen()?))
    }

    pub fn with_interrupt(
        shell: Vec<String>,
        working_dir: impl Into<PathBuf>,
        interrupt: InterruptFlag,
    ) -> Self {
        Self {
            shell,
            working_dir: working_dir.into(),
            interrupt,
        }
    }

    fn command(&self, request: &LineRequest) -> Result<Command> {
        let (program, args) = self
            .shell
            .split_first()
            .ok_or_else(|| RundagError::Other(anyhow!("`set shell` names no program")))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(&request.command)
            .current_dir(&self.working_dir)
            .env_clear()
            .envs(request.environment.iter())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        Ok(cmd)
    }

    async fn run(&self, request: LineRequest) -> Result<LineOutcome> {
        if self.interrupt.is_set() {
            warn!(recipe = %request.recipe, "interrupted; not starting line");
            return Ok(LineOutcome::Interrupted);
        }

        let mut cmd = self.command(&request)?;
        debug!(recipe = %request.recipe, command = %request.command, "spawning line");

        let mut child = cmd.spawn().map_err(|source| RundagError::Spawn {
            recipe: request.recipe.clone(),
            program: self.shell.join(" "),
            source,
        })?;

        let mut interrupt = self.interrupt.clone();
        tokio::select! {
            status = child.wait() => {
                let status = status?;
                // A terminal Ctrl-C reaches the child too; let the listener
                // record it before deciding how the line ended.
                tokio::task::yield_now().await;
                if self.interrupt.is_set() || killed_by_sigint(status) {
                    warn!(recipe = %request.recipe, "line ended by interrupt");
                    return Ok(LineOutcome::Interrupted);
                }
                let outcome = outcome_of(status);
                info!(recipe = %request.recipe, ?outcome, "line exited");
                Ok(outcome)
            }
            () = interrupt.triggered() => {
                warn!(recipe = %request.recipe, "interrupted; killing child");
                child.kill().await?;
                Ok(LineOutcome::Interrupted)
            }
        }
    }
}

impl CommandBackend for ShellBackend {
    fn run_line(
        &mut self,
        request: LineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<LineOutcome>> + Send + '_>> {
        Box::pin(self.run(request))
    }
}

fn outcome_of(status: ExitStatus) -> LineOutcome {
    if status.success() {
        return LineOutcome::Success;
    }
    match status.code() {
        Some(code) => LineOutcome::Failed(code),
        None => LineOutcome::Failed(signal_code(status)),
    }
}

#[cfg(unix)]
fn signal_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| 128 + sig).unwrap_or(1)
}

#[cfg(not(unix))]
fn signal_code(_status: ExitStatus) -> i32 {
    1
}

#[cfg(unix)]
fn killed_by_sigint(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    use tokio::signal::unix::SignalKind;
    status.signal() == Some(SignalKind::interrupt().as_raw_value())
}

#[cfg(not(unix))]
fn killed_by_sigint(_status: ExitStatus) -> bool {
    false
}
