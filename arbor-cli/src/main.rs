//! arbor - build Merkle trees over files and check inclusion proofs

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, HasherKind};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Merkle tree commitments and inclusion proofs", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file path (defaults to <config dir>/arbor/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hash primitive: sha512 or blake3 (overrides config)
    #[arg(long, global = true)]
    hasher: Option<HasherKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a tree over the given files and print its root digest
    Root {
        /// Files, in leaf order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Build a tree and recompute its root from the stored leaves
    Verify {
        /// Files, in leaf order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the inclusion proof for one file
    Prove {
        /// File to prove (its contents are hashed to find the leaf)
        target: PathBuf,

        /// Files, in leaf order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check an inclusion proof against a root digest, without the tree
    Check {
        /// Trusted root digest (hex)
        #[arg(long)]
        root: String,

        /// Leaf digest (hex)
        #[arg(long)]
        leaf: String,

        /// Path point as <sibling-hex>:<append|prepend>, bottom-up
        #[arg(long = "point")]
        points: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(hasher) = cli.hasher {
        config.hasher = hasher;
    }
    config.validate()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    colored::control::set_override(config.color);

    commands::run(cli.command, &config)
}
