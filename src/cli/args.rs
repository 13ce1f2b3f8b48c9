//! CLI argument definitions using clap
//!
//! Commands:
//! - pathstore init --config <path> [--name <name>]
//! - pathstore save --config <path> <tags>... --value <json>
//! - pathstore load --config <path> <tags>...
//! - pathstore list --config <path> [tags]...
//! - pathstore latest --config <path> [tags]...
//! - pathstore exists --config <path> [tags]...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pathstore - hierarchical key/value storage over a flat document collection
#[derive(Parser, Debug)]
#[command(name = "pathstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./pathstore.json")]
        config: PathBuf,

        /// Storage name written into the new config
        #[arg(long, default_value = "pathstore")]
        name: String,
    },

    /// Save a JSON value at a tag path
    Save {
        /// Path to configuration file
        #[arg(long, default_value = "./pathstore.json")]
        config: PathBuf,

        /// Tag path, root first
        #[arg(required = true)]
        tags: Vec<String>,

        /// Value as JSON; encoded arrays are stored as arrays
        #[arg(long)]
        value: String,
    },

    /// Load the value at a tag path
    Load {
        /// Path to configuration file
        #[arg(long, default_value = "./pathstore.json")]
        config: PathBuf,

        /// Tag path, root first
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// List child tags of a path (the root when empty)
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./pathstore.json")]
        config: PathBuf,

        tags: Vec<String>,
    },

    /// Path to the greatest child tag of a path
    Latest {
        /// Path to configuration file
        #[arg(long, default_value = "./pathstore.json")]
        config: PathBuf,

        tags: Vec<String>,
    },

    /// Check whether a tag path exists
    Exists {
        /// Path to configuration file
        #[arg(long, default_value = "./pathstore.json")]
        config: PathBuf,

        tags: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
