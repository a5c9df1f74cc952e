//! CLI argument parsing for keystore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ks")]
#[command(author, version, about = "Inspect and edit durable key-value slots", long_about = None)]
pub struct Cli {
    /// Store directory (default: local data dir)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a record
    Get {
        /// Record key
        #[arg(required = true)]
        key: String,
    },

    /// Write a record from a JSON literal
    Set {
        /// Record key
        #[arg(required = true)]
        key: String,

        /// JSON value to store
        #[arg(required = true)]
        value: String,
    },

    /// Delete a record
    Rm {
        /// Record key
        #[arg(required = true)]
        key: String,
    },

    /// List all keys
    Keys,
}
