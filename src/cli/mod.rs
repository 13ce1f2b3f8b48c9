//! CLI module for pathstore
//!
//! Provides command-line access to a file-backed store:
//! - init: Write a default config file
//! - save / load: Store and read values at tag paths
//! - list / latest / exists: Inspect the tree

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exists, init, latest, list, load, run, run_command, save};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
