//! Command-line interface for targetcond.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, FlagsArgs, ResolveArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
