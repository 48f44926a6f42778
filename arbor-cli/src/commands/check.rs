//! Stateless proof check

use anyhow::{Context, Result};
use arbor_merkle::{compute_root, HashValue, MerkleHasher, PathPoint};
use colored::Colorize;

pub fn handle<H: MerkleHasher>(root: &str, leaf: &str, points: &[String]) -> Result<bool> {
    let root = HashValue::from_hex(root).context("Invalid --root")?;
    let leaf = HashValue::from_hex(leaf).context("Invalid --leaf")?;
    let path = points
        .iter()
        .map(|p| parse_point(p))
        .collect::<Result<Vec<_>>>()?;

    println!("{} Checking proof with {} point(s)...", "→".cyan().bold(), path.len());

    let computed = compute_root::<H>(&leaf, &path);
    if computed == root {
        println!("{} Leaf is included under root", "✓".green().bold());
        Ok(true)
    } else {
        println!("{} Proof does not match root", "✗".red().bold());
        println!("  Computed: {}", computed.to_hex().red());
        Ok(false)
    }
}

/// Parse `<sibling-hex>:<append|prepend>` into a path point
fn parse_point(point: &str) -> Result<PathPoint> {
    let (sibling, side) = point
        .rsplit_once(':')
        .ok_or_else(|| anyhow::anyhow!("Invalid point '{}'. Expected <hex>:<append|prepend>", point))?;

    let sibling = HashValue::from_hex(sibling)
        .with_context(|| format!("Invalid sibling digest in point '{}'", point))?;
    let appended = match side {
        "append" | "a" => true,
        "prepend" | "p" => false,
        other => anyhow::bail!("Invalid side '{}'. Expected append or prepend", other),
    };

    Ok(PathPoint::new(sibling, appended))
}
