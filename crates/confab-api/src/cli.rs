//! CLI definitions for the `confab` binary.
//!
//! Uses clap derive macros. The only verb today is `serve`; the global
//! flags control log verbosity.

use clap::{Parser, Subcommand};

/// Chat backend with AI-turn orchestration.
#[derive(Parser)]
#[command(name = "confab", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Listen address, overriding the configured `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },
}
