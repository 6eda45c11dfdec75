//! CLI command definitions for the `dchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with an AI assistant that draws Mermaid diagrams.
#[derive(Parser)]
#[command(name = "dchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding `chat_app.db` and `config.toml`.
    #[arg(long, global = true, env = "DIAGRAMCHAT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// List chat sessions with message counts.
    #[command(alias = "ls")]
    Sessions,

    /// Print the stored messages of a session.
    History {
        /// Session id.
        session_id: String,

        /// Maximum number of messages (defaults to the configured history limit).
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
