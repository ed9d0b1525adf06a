// src/definition/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::definition::model::{Justfile, RawJustfile};
use crate::definition::parser::parse;
use crate::errors::{Result, RundagError};

/// File names searched for, in order, in each directory.
pub const JUSTFILE_NAMES: [&str; 3] = ["justfile", "Justfile", ".justfile"];

/// Load a justfile from a given path and return the unvalidated
/// `RawJustfile`.
///
/// This only performs parsing; it does **not** check names, dependencies or
/// cycles. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJustfile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = contents.len(), "read justfile");
    parse(&contents)
}

/// Load a justfile from path, parse it and run load-time validation.
///
/// This is the recommended entry point for the rest of the application.
/// Any error here is fatal: nothing is partially loaded.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Justfile> {
    let raw = load_from_path(&path)?;
    Justfile::try_from(raw)
}

/// Parse and validate justfile source held in memory.
pub fn load_str(source: &str) -> Result<Justfile> {
    Justfile::try_from(parse(source)?)
}

/// Find the justfile for `start`: the first of [`JUSTFILE_NAMES`] present
/// in `start` or, failing that, in the nearest ancestor directory.
pub fn discover(start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        for name in JUSTFILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "discovered justfile");
                return Ok(candidate);
            }
        }
    }
    Err(RundagError::JustfileNotFound {
        search_root: start.to_path_buf(),
    })
}

/// Directory commands run in by default: the one containing the justfile.
///
/// A bare file name (parent = "") falls back to the current directory.
pub fn justfile_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
