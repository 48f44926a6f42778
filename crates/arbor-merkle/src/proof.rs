//! Inclusion proofs.
//!
//! A proof is the ordered list of sibling digests met while walking from a
//! leaf up to the root. Replaying it needs only the claimed leaf digest and a
//! trusted root digest, never the tree itself.

use std::marker::PhantomData;

use crate::hash::{MerkleHasher, Sha512Hasher};
use crate::HashValue;

/// One level of an inclusion path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathPoint {
    /// Digest of the sibling at this level.
    pub sibling: HashValue,
    /// `true` when the running digest was the left child, so the replay is
    /// `H(current ++ sibling)`; `false` means `H(sibling ++ current)`.
    pub appended: bool,
}

impl PathPoint {
    pub fn new(sibling: HashValue, appended: bool) -> Self {
        Self { sibling, appended }
    }

    /// Combine the running digest with this level's sibling.
    pub fn apply<H: MerkleHasher>(&self, current: &HashValue) -> HashValue {
        if self.appended {
            H::hash_pair(current, &self.sibling)
        } else {
            H::hash_pair(&self.sibling, current)
        }
    }
}

/// Replay `path` starting from `target` and compare against `root`.
///
/// Stateless: a verifier that only stores the root digest can call this.
pub fn verify_proof<H: MerkleHasher>(
    target: &HashValue,
    path: &[PathPoint],
    root: &HashValue,
) -> bool {
    compute_root::<H>(target, path) == *root
}

/// Digest obtained by replaying `path` from `target`.
pub fn compute_root<H: MerkleHasher>(target: &HashValue, path: &[PathPoint]) -> HashValue {
    path.iter()
        .fold(*target, |current, point| point.apply::<H>(&current))
}

/// The path from a leaf to (not including) the root, bottom-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InclusionProof<H: MerkleHasher = Sha512Hasher> {
    leaf: HashValue,
    points: Vec<PathPoint>,
    _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> InclusionProof<H> {
    pub fn new(leaf: HashValue, points: Vec<PathPoint>) -> Self {
        Self {
            leaf,
            points,
            _hasher: PhantomData,
        }
    }

    /// The leaf digest this proof was generated for.
    pub fn leaf(&self) -> &HashValue {
        &self.leaf
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<PathPoint> {
        self.points
    }

    pub fn compute_root(&self) -> HashValue {
        compute_root::<H>(&self.leaf, &self.points)
    }

    /// Check the proof's own leaf against a trusted root.
    pub fn verify(&self, root: &HashValue) -> bool {
        verify_proof::<H>(&self.leaf, &self.points, root)
    }
}
