//! Command-line interface

use clap::{Parser, Subcommand};

/// Resume generator and LLM answer auditor
#[derive(Parser, Debug)]
#[command(name = "agent-hooks")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a resume from candidate information read on stdin
    Resume {
        /// Session to continue; a new one is created when omitted
        #[arg(long)]
        session_id: Option<String>,

        /// Owner of the stored resume
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Fact check and revise a question/answer pair read on stdin
    Audit,
}
