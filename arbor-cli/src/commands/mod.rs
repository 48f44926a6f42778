//! Command handlers

mod check;
mod tree;

use anyhow::{Context, Result};
use arbor_merkle::{Blake3Hasher, MerkleHasher, Sha512Hasher};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use crate::config::{Config, HasherKind};
use crate::Commands;

pub fn run(command: Commands, config: &Config) -> Result<ExitCode> {
    match config.hasher {
        HasherKind::Sha512 => dispatch::<Sha512Hasher>(command),
        HasherKind::Blake3 => dispatch::<Blake3Hasher>(command),
    }
}

fn dispatch<H: MerkleHasher>(command: Commands) -> Result<ExitCode> {
    debug!(hasher = H::NAME, "Running command");
    let success = match command {
        Commands::Root { files } => tree::root::<H>(&files),
        Commands::Verify { files } => tree::verify::<H>(&files),
        Commands::Prove { target, files } => tree::prove::<H>(&target, &files),
        Commands::Check { root, leaf, points } => check::handle::<H>(&root, &leaf, &points),
    }?;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Read every file, preserving argument order.
fn read_values(files: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    files.iter().map(|path| read_value(path)).collect()
}

fn read_value(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
