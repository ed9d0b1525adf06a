use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use rundag::errors::Result;
use rundag::exec::{CommandBackend, LineOutcome, LineRequest};

/// A fake backend that:
/// - records every request it receives, in order
/// - reports `Success` unless the exact command text was scripted otherwise.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    executed: Arc<Mutex<Vec<LineRequest>>>,
    outcomes: HashMap<String, LineOutcome>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `outcome` whenever `command` is run.
    pub fn with_outcome(mut self, command: &str, outcome: LineOutcome) -> Self {
        self.outcomes.insert(command.to_string(), outcome);
        self
    }

    /// Shorthand for a command that exits with `code`.
    pub fn failing(self, command: &str, code: i32) -> Self {
        self.with_outcome(command, LineOutcome::Failed(code))
    }

    /// Shared handle to the request log; stays valid after the backend is
    /// moved into a runtime.
    pub fn log(&self) -> Arc<Mutex<Vec<LineRequest>>> {
        Arc::clone(&self.executed)
    }

    /// Commands run so far.
    pub fn commands(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.command.clone())
            .collect()
    }

    /// Recipe of each command run so far.
    pub fn recipes(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.recipe.clone())
            .collect()
    }
}

impl CommandBackend for RecordingBackend {
    fn run_line(
        &mut self,
        request: LineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<LineOutcome>> + Send + '_>> {
        let outcome = self
            .outcomes
            .get(&request.command)
            .copied()
            .unwrap_or(LineOutcome::Success);
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(request);
            Ok(outcome)
        })
    }
}
