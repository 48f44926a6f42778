//! Tree command handlers: root, verify, prove

use anyhow::Result;
use arbor_merkle::{verify_proof, MerkleHasher, MerkleTree};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{read_value, read_values};

fn build<H: MerkleHasher>(files: &[PathBuf]) -> Result<MerkleTree<H>> {
    let values = read_values(files)?;
    let tree = MerkleTree::<H>::build(&values)?;
    info!(files = files.len(), leaves = tree.leaf_count(), "Tree built");
    Ok(tree)
}

pub fn root<H: MerkleHasher>(files: &[PathBuf]) -> Result<bool> {
    let tree = build::<H>(files)?;

    println!("{} Built tree ({})", "✓".green().bold(), H::NAME.cyan());
    println!("  Values: {}", files.len());
    println!("  Leaves: {}", tree.leaf_count());
    println!("  Root:   {}", tree.root_digest().to_hex().cyan());

    Ok(true)
}

pub fn verify<H: MerkleHasher>(files: &[PathBuf]) -> Result<bool> {
    let tree = build::<H>(files)?;

    println!("{} Verifying tree over {} file(s)...", "→".cyan().bold(), files.len());
    if tree.verify() {
        println!("{} Root matches stored leaves", "✓".green().bold());
        println!("  Root: {}", tree.root_digest().to_hex().cyan());
        Ok(true)
    } else {
        println!("{} Root does not match stored leaves", "✗".red().bold());
        Ok(false)
    }
}

pub fn prove<H: MerkleHasher>(target: &Path, files: &[PathBuf]) -> Result<bool> {
    let tree = build::<H>(files)?;
    let leaf = tree.hash_value(&read_value(target)?);
    let root = tree.root_digest();

    let proof = match tree.proof(&leaf) {
        Ok(proof) => proof,
        Err(e) => {
            println!("{} {}", "✗".red().bold(), e.to_string().red());
            println!(
                "{} {} is not one of the tree's values",
                "→".dimmed(),
                target.display().to_string().dimmed()
            );
            return Ok(false);
        }
    };

    println!("{} Inclusion proof for {}", "→".cyan().bold(), target.display().to_string().cyan());
    println!("  Leaf:  {}", leaf.to_hex());
    println!("  Root:  {}", root.to_hex());
    println!("  Depth: {}", proof.len());
    println!();
    println!("  {:<6} {:<8} {}", "LEVEL".bold(), "SIDE".bold(), "SIBLING".bold());
    println!("  {}", "-".repeat(60));
    for (level, point) in proof.points().iter().enumerate() {
        let side = if point.appended { "append" } else { "prepend" };
        println!("  {:<6} {:<8} {}", level, side, point.sibling.to_hex());
    }
    println!();

    if verify_proof::<H>(&leaf, proof.points(), &root) {
        println!("{} Proof replays to the root", "✓".green().bold());
        Ok(true)
    } else {
        println!("{} Proof does not replay to the root", "✗".red().bold());
        Ok(false)
    }
}
