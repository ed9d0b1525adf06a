// src/definition/mod.rs

//! Recipe definitions: the justfile data model, parser and validation.
//!
//! Responsibilities:
//! - Define the in-memory model (`model.rs`) and typed templates
//!   (`template.rs`).
//! - Parse justfile text (`parser.rs`) and write it back (`dump.rs`).
//! - Load a file from disk (`loader.rs`).
//! - Validate load-time invariants like unique names and an acyclic
//!   dependency graph (`validate.rs`).
//!
//! Grammar, one item per column-0 line:
//!
//! ```text
//! # doc comment (directly above a header)
//! [private]
//! @?name param param="default" *rest +$more: dep1 dep2
//!     [@-]command line with {{param}} placeholders
//! name := "value"
//! export NAME := 'value'
//! alias short := name
//! set shell := ["bash", "-cu"]
//! set export
//! set quiet
//! ```

pub mod dump;
pub mod loader;
pub mod model;
pub mod parser;
pub mod template;
pub mod validate;

pub use loader::{discover, load_and_validate, load_from_path, load_str};
pub use model::{
    Alias, Assignment, Justfile, Line, Parameter, ParameterKind, RawJustfile, Recipe,
    RecipeName, Settings,
};
pub use template::{Fragment, Template};
