// src/lib.rs

pub mod cli;
pub mod dag;
pub mod definition;
pub mod engine;
pub mod environment;
pub mod errors;
pub mod exec;
pub mod listing;
pub mod logging;
pub mod params;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cli::{CliArgs, DumpFormat};
use crate::dag::{select_recipe, Scheduler};
use crate::definition::loader::justfile_dir;
use crate::definition::{discover, load_and_validate, Justfile};
use crate::engine::{RunOptions, Runtime};
use crate::environment::Environment;
use crate::errors::Result;
use crate::exec::ShellBackend;
use crate::listing::{render_list, render_show};
use crate::params::Invocation;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - justfile discovery and loading
/// - the read-only views (`--dump`, `--list`, `--show`)
/// - recipe selection and planning
/// - the runtime with the shell backend
pub async fn run(args: CliArgs) -> Result<()> {
    let path = justfile_path(&args)?;
    let justfile = load_and_validate(&path)?;
    info!(
        path = %path.display(),
        recipes = justfile.recipes().len(),
        "loaded justfile"
    );

    if args.dump {
        return print_dump(&justfile, args.dump_format);
    }
    if args.list {
        print!("{}", render_list(&justfile));
        return Ok(());
    }
    if let Some(name) = &args.show {
        print!("{}", render_show(&justfile, name)?);
        return Ok(());
    }

    let invocation = Invocation::from_args(&args.arguments);
    debug!(?invocation, "parsed invocation");

    let Some(target) = select_recipe(&justfile, invocation.recipe.as_deref())? else {
        info!("justfile defines no recipes; listing instead");
        print!("{}", render_list(&justfile));
        return Ok(());
    };

    let options = RunOptions {
        dry_run: args.dry_run,
        quiet: args.quiet,
    };
    let scheduler = Scheduler::plan(
        &justfile,
        target,
        &invocation,
        &Environment::from_process(),
        &options,
    )?;

    let working_dir = args
        .working_directory
        .clone()
        .unwrap_or_else(|| justfile_dir(&path));
    debug!(dir = %working_dir.display(), shell = ?justfile.shell(), "starting runtime");

    let backend = ShellBackend::new(justfile.shell(), working_dir)?;
    Runtime::new(scheduler, backend, options).run().await
}

fn justfile_path(args: &CliArgs) -> Result<PathBuf> {
    match &args.justfile {
        Some(path) => Ok(path.clone()),
        None => discover(&std::env::current_dir()?),
    }
}

fn print_dump(justfile: &Justfile, format: DumpFormat) -> Result<()> {
    match format {
        DumpFormat::Just => print!("{justfile}"),
        DumpFormat::Json => println!("{}", serde_json::to_string_pretty(justfile)?),
    }
    Ok(())
}
