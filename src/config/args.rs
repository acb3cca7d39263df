//! Command-line argument parsing

use clap::{Parser, Subcommand};

/// Nyooom URL shortener
#[derive(Parser, Debug)]
#[command(name = "nyooom", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Write a sample configuration file
    ConfigGen {
        #[arg(default_value = "config.example.toml")]
        path: String,
    },
    /// Replace the stored account password
    ResetPassword {
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        stdin: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
