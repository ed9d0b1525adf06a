// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the [`CommandBackend`] trait the runtime talks to,
//!   so tests can substitute a recording fake.
//! - [`command`] holds [`ShellBackend`], which hands each line to the
//!   configured shell with `tokio::process::Command`.
//! - [`interrupt`] keeps the Ctrl-C state [`ShellBackend`] consults before
//!   and while each line runs.

pub mod backend;
pub mod command;
pub mod interrupt;

pub use backend::{CommandBackend, LineOutcome, LineRequest};
pub use command::ShellBackend;
pub use interrupt::InterruptFlag;
