#![allow(dead_code)]

pub use rundag_test_utils::builders;
pub use rundag_test_utils::fake_backend::RecordingBackend;
pub use rundag_test_utils::{init_tracing, with_timeout};

use rundag::dag::{select_recipe, Scheduler};
use rundag::definition::Justfile;
use rundag::engine::RunOptions;
use rundag::environment::Environment;
use rundag::errors::Result;
use rundag::params::Invocation;

/// Plan `args` (as typed after the binary name) against `justfile`.
pub fn plan(justfile: &Justfile, args: &[&str], options: RunOptions) -> Result<Scheduler> {
    let invocation = Invocation::from_args(args);
    let target = select_recipe(justfile, invocation.recipe.as_deref())?
        .expect("justfile has at least one recipe");
    Scheduler::plan(
        justfile,
        target,
        &invocation,
        &Environment::default(),
        &options,
    )
}
