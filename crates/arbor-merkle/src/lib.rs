//! # arbor-merkle
//!
//! An immutable binary Merkle tree over an ordered list of byte-string values.
//!
//! The tree is built once from the complete value set and commits to it with a
//! single root digest. It supports two kinds of checks:
//!
//! - **Full verification** ([`MerkleTree::verify`]): recompute the root from
//!   the stored leaves and compare it with the stored root.
//! - **Inclusion proofs** ([`MerkleTree::proof`], [`verify_proof`]): a sibling
//!   path from one leaf up to the root, which a holder of just the root digest
//!   can replay.
//!
//! ## Hashing
//!
//! Digests are 64 bytes. [`Sha512Hasher`] is the default primitive;
//! [`Blake3Hasher`] reads 64 bytes out of BLAKE3's extendable output. Leaves
//! are `H(value)` and internal nodes are `H(left ++ right)`, with no domain
//! prefixes.
//!
//! ## Concurrency
//!
//! A built tree has no mutating API and is `Send + Sync`; share it by
//! reference across threads without locking.

pub mod error;
pub mod hash;
pub mod node;
pub mod proof;
pub mod tree;

pub use error::{MerkleError, MerkleResult};
pub use hash::{Blake3Hasher, HashValue, MerkleHasher, Sha512Hasher};
pub use node::{Node, NodeId, NodeKind};
pub use proof::{compute_root, verify_proof, InclusionProof, PathPoint};
pub use tree::MerkleTree;

/// The length of hash digests used in the tree (64 bytes = 512 bits)
pub const HASH_LENGTH: usize = 64;

/// Full verification of a possibly absent tree. `None` is never verified.
pub fn verify_tree<H: MerkleHasher>(tree: Option<&MerkleTree<H>>) -> bool {
    tree.is_some_and(|tree| tree.verify())
}

/// Proof generation on a possibly absent tree.
///
/// Fails with [`MerkleError::EmptyTree`] for `None`, otherwise behaves like
/// [`MerkleTree::proof`].
pub fn prove<H: MerkleHasher>(
    tree: Option<&MerkleTree<H>>,
    target: &HashValue,
) -> MerkleResult<InclusionProof<H>> {
    tree.ok_or(MerkleError::EmptyTree)?.proof(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_tree_basic() {
        let leaves: Vec<Vec<u8>> = vec![
            b"leaf0".to_vec(),
            b"leaf1".to_vec(),
            b"leaf2".to_vec(),
            b"leaf3".to_vec(),
        ];

        let tree: MerkleTree = MerkleTree::build(&leaves).unwrap();
        let root = tree.root_digest();
        assert!(tree.verify());

        // Verify all proofs against the bare root
        for leaf in &leaves {
            let digest = Sha512Hasher::hash(leaf);
            let proof = tree.proof(&digest).unwrap();
            assert_eq!(proof.len(), 2);
            assert!(verify_proof::<Sha512Hasher>(&digest, proof.points(), &root));
        }
    }

    #[test]
    fn test_absent_tree() {
        let target = Sha512Hasher::hash(b"a");
        assert!(!verify_tree::<Sha512Hasher>(None));
        assert_eq!(
            prove::<Sha512Hasher>(None, &target).unwrap_err(),
            MerkleError::EmptyTree
        );
    }

    #[test]
    fn test_present_tree_helpers() {
        let tree: MerkleTree = MerkleTree::build(["a", "b"]).unwrap();
        let target = tree.hash_value(b"a");

        assert!(verify_tree(Some(&tree)));
        let proof = prove(Some(&tree), &target).unwrap();
        assert!(proof.verify(&tree.root_digest()));

        let missing = tree.hash_value(b"zz");
        assert_eq!(
            prove(Some(&tree), &missing).unwrap_err(),
            MerkleError::LeafNotFound(missing)
        );
    }

    #[test]
    fn test_tree_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MerkleTree<Sha512Hasher>>();
        assert_send_sync::<MerkleTree<Blake3Hasher>>();
    }
}
