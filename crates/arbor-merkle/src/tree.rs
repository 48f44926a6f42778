//! Binary Merkle tree over an ordered list of values.
//!
//! # Construction
//!
//! Every value becomes a leaf holding `H(value)`. An odd leaf count is padded
//! with one extra leaf carrying the last leaf's digest, then the leaves are
//! reduced FIFO: the two oldest queue entries are combined into a parent that
//! goes to the back of the queue, until one node is left.
//!
//! The FIFO order does not keep the tree balanced when an intermediate level
//! has an odd length, so leaves can sit at different depths. Proofs follow the
//! real parent links and stay valid, but the digests that appear in them
//! depend on this exact reduction order.
//!
//! # Example
//!
//! ```
//! use arbor_merkle::MerkleTree;
//!
//! let tree: MerkleTree = MerkleTree::build(["a", "b", "c"]).unwrap();
//! assert!(tree.verify());
//!
//! let target = tree.hash_value(b"b");
//! let proof = tree.proof(&target).unwrap();
//! assert!(tree.verify_proof(&target, proof.points()));
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use crate::error::{MerkleError, MerkleResult};
use crate::hash::{HashValue, MerkleHasher, Sha512Hasher};
use crate::node::{Node, NodeId, NodeKind};
use crate::proof::{self, InclusionProof, PathPoint};

/// Pairwise FIFO reduction shared by construction and verification.
///
/// Returns `None` only for an empty queue.
fn fifo_reduce<T>(mut queue: VecDeque<T>, mut combine: impl FnMut(T, T) -> T) -> Option<T> {
    while queue.len() > 1 {
        let left = queue.pop_front()?;
        let right = queue.pop_front()?;
        queue.push_back(combine(left, right));
    }
    queue.pop_front()
}

/// An immutable Merkle tree. Built once by [`MerkleTree::build`], never mutated.
pub struct MerkleTree<H: MerkleHasher = Sha512Hasher> {
    /// Arena holding every node. Leaves come first, in input order.
    nodes: Vec<Node>,
    /// Leaf ids in stored order, padding included.
    leaves: Vec<NodeId>,
    root: NodeId,
    _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Build a tree from an ordered, non-empty list of values.
    ///
    /// Fails with [`MerkleError::EmptyInput`] when `values` yields nothing.
    pub fn build<I, V>(values: I) -> MerkleResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let mut nodes: Vec<Node> = values
            .into_iter()
            .map(|value| Node::leaf(H::hash(value.as_ref())))
            .collect();

        let value_count = nodes.len();
        if value_count == 0 {
            return Err(MerkleError::EmptyInput);
        }

        // Pad to an even count with a distinct leaf carrying the last digest.
        if value_count % 2 == 1 {
            let last = nodes[value_count - 1].digest;
            nodes.push(Node::leaf(last));
        }

        let leaves: Vec<NodeId> = (0..nodes.len()).map(NodeId).collect();

        let root = fifo_reduce(leaves.iter().copied().collect(), |left, right| {
            let digest = H::hash_pair(&nodes[left.0].digest, &nodes[right.0].digest);
            let id = NodeId(nodes.len());
            nodes.push(Node::internal(left, right, digest));
            nodes[left.0].parent = Some(id);
            nodes[right.0].parent = Some(id);
            trace!(node = id.0, left = left.0, right = right.0, "combined pair");
            id
        })
        .ok_or(MerkleError::EmptyInput)?;

        debug!(
            hasher = H::NAME,
            values = value_count,
            leaves = leaves.len(),
            nodes = nodes.len(),
            root = %nodes[root.0].digest.short(),
            "Built merkle tree"
        );

        Ok(Self {
            nodes,
            leaves,
            root,
            _hasher: PhantomData,
        })
    }

    /// Hash a raw value with this tree's primitive, i.e. the digest its leaf
    /// would carry.
    pub fn hash_value(&self, value: &[u8]) -> HashValue {
        H::hash(value)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root_digest(&self) -> HashValue {
        self.nodes[self.root.0].digest
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Total number of nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored leaves, padding included. Always even.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaf_ids(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Leaf nodes in stored order.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> + '_ {
        self.leaves.iter().map(move |id| &self.nodes[id.0])
    }

    pub fn leaf_digests(&self) -> Vec<HashValue> {
        self.leaves().map(|leaf| leaf.digest).collect()
    }

    /// First leaf, in stored order, whose digest equals `target`.
    pub fn find_leaf(&self, target: &HashValue) -> Option<NodeId> {
        self.leaves
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].digest == *target)
    }

    pub fn contains(&self, target: &HashValue) -> bool {
        self.find_leaf(target).is_some()
    }

    /// Number of edges between `id` and the root.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        let mut node = self.nodes.get(id.0)?;
        let mut depth = 0;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            depth += 1;
        }
        Some(depth)
    }

    /// Rerun the FIFO reduction over the stored leaf digests and compare with
    /// the stored root digest.
    ///
    /// This checks the stored leaves against the stored root. It says nothing
    /// about whether those leaves are the hashes of any particular values.
    pub fn verify(&self) -> bool {
        let queue: VecDeque<HashValue> = self.leaves().map(|leaf| leaf.digest).collect();
        let Some(computed) = fifo_reduce(queue, |left, right| H::hash_pair(&left, &right)) else {
            return false;
        };

        let stored = self.root_digest();
        if computed != stored {
            warn!(
                computed = %computed.short(),
                stored = %stored.short(),
                "Merkle root mismatch"
            );
            return false;
        }
        true
    }

    /// Check every internal node against its children: the digest must be the
    /// hash of the two child digests and both children must point back to it.
    pub fn verify_nodes(&self) -> bool {
        if self.nodes[self.root.0].parent.is_some() {
            return false;
        }
        self.nodes.iter().enumerate().all(|(index, node)| match node.kind {
            NodeKind::Leaf => true,
            NodeKind::Internal { left, right } => {
                let (Some(l), Some(r)) = (self.nodes.get(left.0), self.nodes.get(right.0)) else {
                    return false;
                };
                let linked = l.parent == Some(NodeId(index)) && r.parent == Some(NodeId(index));
                linked && H::hash_pair(&l.digest, &r.digest) == node.digest
            }
        })
    }

    /// Build the inclusion proof for the leftmost leaf whose digest is
    /// `target`.
    pub fn proof(&self, target: &HashValue) -> MerkleResult<InclusionProof<H>> {
        let leaf = self
            .find_leaf(target)
            .ok_or(MerkleError::LeafNotFound(*target))?;

        let mut points = Vec::new();
        let mut current = leaf;
        while let Some(parent) = self.nodes[current.0].parent {
            // parents are always internal
            let Some((left, right)) = self.nodes[parent.0].children() else {
                break;
            };
            let point = if left == current {
                PathPoint::new(self.nodes[right.0].digest, true)
            } else {
                PathPoint::new(self.nodes[left.0].digest, false)
            };
            points.push(point);
            current = parent;
        }

        debug!(
            leaf = leaf.0,
            target = %target.short(),
            depth = points.len(),
            "Generated inclusion proof"
        );

        Ok(InclusionProof::new(*target, points))
    }

    /// Replay `path` from `target` against this tree's root digest.
    pub fn verify_proof(&self, target: &HashValue, path: &[PathPoint]) -> bool {
        proof::verify_proof::<H>(target, path, &self.root_digest())
    }
}

impl<H: MerkleHasher> fmt::Debug for MerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("hasher", &H::NAME)
            .field("root", &self.root_digest())
            .field("leaves", &self.leaves.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Blake3Hasher;

    fn h(data: &[u8]) -> HashValue {
        Sha512Hasher::hash(data)
    }

    fn pair(left: &HashValue, right: &HashValue) -> HashValue {
        Sha512Hasher::hash_pair(left, right)
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let values: Vec<Vec<u8>> = vec![];
        let result = MerkleTree::<Sha512Hasher>::build(values);
        assert_eq!(result.unwrap_err(), MerkleError::EmptyInput);
    }

    #[test]
    fn test_single_value_is_padded() {
        let tree: MerkleTree = MerkleTree::build(["x"]).unwrap();
        let lx = h(b"x");

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.leaf_digests(), vec![lx, lx]);
        assert_ne!(tree.leaf_ids()[0], tree.leaf_ids()[1]);
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.root_digest(), pair(&lx, &lx));
        assert!(tree.verify());

        let proof = tree.proof(&lx).unwrap();
        assert_eq!(proof.points(), &[PathPoint::new(lx, true)]);
        assert!(tree.verify_proof(&lx, proof.points()));
    }

    #[test]
    fn test_two_values() {
        let tree: MerkleTree = MerkleTree::build(["a", "b"]).unwrap();
        let la = h(b"a");
        let lb = h(b"b");

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.root_digest(), pair(&la, &lb));

        let proof_a = tree.proof(&la).unwrap();
        assert_eq!(proof_a.points(), &[PathPoint::new(lb, true)]);
        assert!(tree.verify_proof(&la, proof_a.points()));

        let proof_b = tree.proof(&lb).unwrap();
        assert_eq!(proof_b.points(), &[PathPoint::new(la, false)]);
        assert!(tree.verify_proof(&lb, &[PathPoint::new(la, false)]));
    }

    #[test]
    fn test_three_values() {
        let tree: MerkleTree = MerkleTree::build(["a", "b", "c"]).unwrap();
        let la = h(b"a");
        let lb = h(b"b");
        let lc = h(b"c");
        let n1 = pair(&la, &lb);
        let n2 = pair(&lc, &lc);

        assert_eq!(tree.leaf_digests(), vec![la, lb, lc, lc]);
        assert_eq!(tree.root_digest(), pair(&n1, &n2));
        assert!(tree.verify());

        let proof_a = tree.proof(&la).unwrap();
        assert_eq!(
            proof_a.points(),
            &[PathPoint::new(lb, true), PathPoint::new(n2, true)]
        );

        // LC and its padding copy share a digest; the first one in order wins.
        assert_eq!(tree.find_leaf(&lc), Some(tree.leaf_ids()[2]));
        let proof_c = tree.proof(&lc).unwrap();
        assert_eq!(
            proof_c.points(),
            &[PathPoint::new(lc, true), PathPoint::new(n1, false)]
        );
        assert!(tree.verify_proof(&lc, proof_c.points()));
    }

    #[test]
    fn test_fifo_reduction_leaves_uneven_depths() {
        // 5 values -> 6 leaves: [L0 L1 L2 L3 L4 L4']
        // A = L0L1, B = L2L3, C = L4L4', D = AB, root = CD
        let values = ["v0", "v1", "v2", "v3", "v4"];
        let tree: MerkleTree = MerkleTree::build(values).unwrap();
        let l: Vec<HashValue> = values.iter().map(|v| h(v.as_bytes())).collect();

        let a = pair(&l[0], &l[1]);
        let b = pair(&l[2], &l[3]);
        let c = pair(&l[4], &l[4]);
        let d = pair(&a, &b);

        assert_eq!(tree.leaf_count(), 6);
        assert_eq!(tree.root_digest(), pair(&c, &d));
        assert_eq!(tree.depth_of(tree.leaf_ids()[0]), Some(3));
        assert_eq!(tree.depth_of(tree.leaf_ids()[4]), Some(2));
        assert_eq!(tree.depth_of(tree.root_id()), Some(0));

        let proof_0 = tree.proof(&l[0]).unwrap();
        assert_eq!(
            proof_0.points(),
            &[
                PathPoint::new(l[1], true),
                PathPoint::new(b, true),
                PathPoint::new(c, false),
            ]
        );

        let proof_4 = tree.proof(&l[4]).unwrap();
        assert_eq!(
            proof_4.points(),
            &[PathPoint::new(l[4], true), PathPoint::new(d, true)]
        );

        for digest in tree.leaf_digests() {
            let proof = tree.proof(&digest).unwrap();
            assert!(tree.verify_proof(&digest, proof.points()));
        }
    }

    #[test]
    fn test_unknown_leaf() {
        let tree: MerkleTree = MerkleTree::build(["a", "b"]).unwrap();
        let missing = h(b"z");
        assert_eq!(
            tree.proof(&missing).unwrap_err(),
            MerkleError::LeafNotFound(missing)
        );
        assert!(!tree.contains(&missing));
    }

    #[test]
    fn test_duplicate_values_use_leftmost_leaf() {
        let tree: MerkleTree = MerkleTree::build(["dup", "x", "dup", "y"]).unwrap();
        let dup = h(b"dup");

        assert_eq!(tree.find_leaf(&dup), Some(tree.leaf_ids()[0]));
        let proof = tree.proof(&dup).unwrap();
        assert_eq!(proof.points()[0], PathPoint::new(h(b"x"), true));
        assert!(tree.verify_proof(&dup, proof.points()));
    }

    #[test]
    fn test_corrupted_leaf_fails_verify() {
        let mut tree: MerkleTree = MerkleTree::build(["a", "b", "c", "d"]).unwrap();
        assert!(tree.verify());
        assert!(tree.verify_nodes());

        tree.nodes[1].digest = h(b"tampered");
        assert!(!tree.verify());
        assert!(!tree.verify_nodes());
    }

    #[test]
    fn test_corrupted_internal_node_caught_by_node_check() {
        let mut tree: MerkleTree = MerkleTree::build(["a", "b", "c", "d"]).unwrap();
        // first internal node sits right after the four leaves
        let internal = tree.leaf_count();
        assert!(!tree.nodes[internal].is_leaf());

        tree.nodes[internal].digest = h(b"tampered");
        // root still matches the leaves
        assert!(tree.verify());
        assert!(!tree.verify_nodes());
    }

    #[test]
    fn test_structure_invariants() {
        let tree: MerkleTree = MerkleTree::build((0..11u32).map(|i| i.to_be_bytes())).unwrap();

        assert_eq!(tree.leaf_count(), 12);
        assert_eq!(tree.node_count(), 2 * tree.leaf_count() - 1);
        assert!(tree.root().parent().is_none());
        assert_eq!(tree.leaves().filter(|n| n.is_leaf()).count(), 12);

        let parentless = (0..tree.node_count())
            .filter(|&i| tree.node(NodeId(i)).unwrap().parent().is_none())
            .count();
        assert_eq!(parentless, 1);
        assert!(tree.node(NodeId(tree.node_count())).is_none());
    }

    #[test]
    fn test_blake3_tree() {
        let tree: MerkleTree<Blake3Hasher> = MerkleTree::build(["a", "b", "c"]).unwrap();
        let sha: MerkleTree = MerkleTree::build(["a", "b", "c"]).unwrap();
        assert!(tree.verify());
        assert_ne!(tree.root_digest(), sha.root_digest());

        let target = tree.hash_value(b"b");
        let proof = tree.proof(&target).unwrap();
        assert!(proof.verify(&tree.root_digest()));
    }

    #[test]
    fn test_debug_output() {
        let tree: MerkleTree = MerkleTree::build(["a"]).unwrap();
        let out = format!("{:?}", tree);
        assert!(out.contains("sha512"));
        assert!(out.contains("leaves: 2"));
    }
}
