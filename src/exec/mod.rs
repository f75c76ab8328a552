// src/exec/mod.rs

//! Process execution layer.
//!
//! The only part of `mkrun` that touches OS process primitives.
//!
//! - [`command`] defines [`Command`], built up with `with_*` copies.
//! - [`mode`] defines the attached / detached / background [`Mode`].
//! - [`io`] defines the [`Endpoint`]s standard streams are wired to.
//! - [`backend`] provides the [`Executor`] trait and the real
//!   [`SystemExecutor`]; tests swap in a fake.
//! - [`traced`] wraps any executor to log each call.
//! - [`error`] holds [`CommandError`] and its stage labels.

pub mod backend;
pub mod command;
pub mod error;
pub mod io;
pub mod mode;
pub mod traced;

pub use backend::{ExecFuture, Executor, SystemExecutor};
pub use command::Command;
pub use error::{CommandError, ExitFailure, Stage};
pub use io::{Endpoint, SharedBuffer, StdStreams};
pub use mode::Mode;
pub use traced::TracingExecutor;
