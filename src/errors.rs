// src/errors.rs

//! Crate-wide error type.
//!
//! Every fatal condition ends the whole invocation. The binary maps each
//! variant to a process exit code via [`RundagError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when the run was interrupted (Ctrl-C).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Error, Debug)]
pub enum RundagError {
    #[error("parse error on line {line}: {message}\n  | {text}")]
    Parse {
        /// 1-based line number in the justfile.
        line: usize,
        /// The offending source line.
        text: String,
        message: String,
    },

    #[error("recipe `{name}` is defined more than once (line {line})")]
    DuplicateRecipe { name: String, line: usize },

    #[error("variable `{name}` is assigned more than once")]
    DuplicateVariable { name: String },

    #[error("alias `{name}` is defined more than once or shadows a recipe")]
    DuplicateAlias { name: String },

    #[error("recipe `{recipe}` has unknown dependency `{dependency}`")]
    UnknownDependency { recipe: String, dependency: String },

    #[error("alias `{alias}` refers to unknown recipe `{target}`")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("recipe `{recipe}` uses unknown variable `{name}`")]
    UnknownVariable { recipe: String, name: String },

    #[error("recipe `{recipe}` has a circular dependency")]
    CyclicDependency { recipe: String },

    #[error("no justfile found in {} or any parent directory", .search_root.display())]
    JustfileNotFound { search_root: PathBuf },

    #[error("recipe `{name}` not found{}", suggestion_suffix(.suggestion))]
    RecipeNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("recipe `{recipe}` requires an argument for parameter `{parameter}`")]
    MissingArgument { recipe: String, parameter: String },

    #[error("recipe `{recipe}` takes at most {max} argument(s) but {given} were given")]
    TooManyArguments {
        recipe: String,
        max: usize,
        given: usize,
    },

    #[error("override `{name}` does not match any variable or parameter")]
    UnknownOverride { name: String },

    #[error("recipe `{recipe}` failed on line `{line}` with exit code {code}")]
    CommandFailure {
        recipe: String,
        line: String,
        code: i32,
    },

    #[error("recipe `{recipe}` could not start `{program}`: {source}")]
    Spawn {
        recipe: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("recipe `{recipe}` was interrupted")]
    Interrupted { recipe: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RundagError {
    /// Process exit code for this error.
    ///
    /// A failing command line propagates its own exit status; everything else
    /// is a generic failure except interruption.
    pub fn exit_code(&self) -> i32 {
        match self {
            RundagError::CommandFailure { code, .. } if *code != 0 => *code,
            RundagError::Interrupted { .. } => INTERRUPTED_EXIT_CODE,
            _ => 1,
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(", did you mean `{name}`?"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, RundagError>;
