//! CLI module
//!
//! Command-line interface over [`CanvasClient`](crate::CanvasClient).
//!
//! # Commands
//!
//! - `check` - Fetch the current user to verify the token
//! - `get` - Fetch one object or page
//! - `list` - Stream a listing, one item per line
//! - `courses`, `users`, `enrollments`, `terms` - Typed listings

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
