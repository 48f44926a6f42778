//! Tree vertices.
//!
//! Nodes are stored in an arena owned by [`MerkleTree`](crate::MerkleTree) and
//! addressed by [`NodeId`]. Child links live in [`NodeKind::Internal`]; the
//! `parent` link is a plain index back-reference, so there is no ownership
//! cycle between a node and its children.

use crate::HashValue;

/// Index of a node inside its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Leaf or internal, with the children of an internal node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Digest is the hash of an input value.
    Leaf,
    /// Digest is the hash of `left ++ right`.
    Internal { left: NodeId, right: NodeId },
}

/// A vertex of the merkle tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) digest: HashValue,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn leaf(digest: HashValue) -> Self {
        Self {
            kind: NodeKind::Leaf,
            digest,
            parent: None,
        }
    }

    pub(crate) fn internal(left: NodeId, right: NodeId, digest: HashValue) -> Self {
        Self {
            kind: NodeKind::Internal { left, right },
            digest,
            parent: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn digest(&self) -> &HashValue {
        &self.digest
    }

    /// `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// `(left, right)` for internal nodes.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf => None,
            NodeKind::Internal { left, right } => Some((left, right)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_has_no_children() {
        let node = Node::leaf(HashValue::ZERO);
        assert!(node.is_leaf());
        assert_eq!(node.children(), None);
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn test_internal_children() {
        let node = Node::internal(NodeId(0), NodeId(1), HashValue::ZERO);
        assert!(!node.is_leaf());
        assert_eq!(node.children(), Some((NodeId(0), NodeId(1))));
        assert_eq!(NodeId(1).index(), 1);
    }
}
