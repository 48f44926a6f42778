//! Hash utilities and types for the merkle tree.

use sha2::{Digest, Sha512};
use std::fmt;

use crate::{MerkleError, MerkleResult, HASH_LENGTH};

/// A 512-bit digest used for leaf and node hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    /// The zero hash (all zeros)
    pub const ZERO: HashValue = HashValue([0u8; HASH_LENGTH]);

    /// Create a new HashValue from a fixed-size array
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a HashValue from a slice
    pub fn from_slice(bytes: &[u8]) -> MerkleResult<Self> {
        if bytes.len() != HASH_LENGTH {
            return Err(MerkleError::InvalidHashLength {
                expected: HASH_LENGTH,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH_LENGTH];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Create a HashValue from hex string
    pub fn from_hex(hex_str: &str) -> MerkleResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str)
            .map_err(|e| MerkleError::InvalidInput(format!("Invalid hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Convert to a Vec<u8>
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Lowercase hex without the `0x` prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First bytes of the digest in hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl Default for HashValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self)
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LENGTH]> for HashValue {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

/// The hash primitive the tree is built with.
///
/// Implementations must be deterministic and total. Leaf digests are
/// `hash(value)`; internal digests are `hash(left ++ right)` with no prefix,
/// separator or length framing.
pub trait MerkleHasher: Send + Sync + 'static {
    /// Short lowercase name, used in logs and configuration.
    const NAME: &'static str;

    /// Hash arbitrary bytes.
    fn hash(data: &[u8]) -> HashValue;

    /// Hash the concatenation of two digests, left first.
    fn hash_pair(left: &HashValue, right: &HashValue) -> HashValue {
        let mut buf = Vec::with_capacity(HASH_LENGTH * 2);
        buf.extend_from_slice(left.as_bytes());
        buf.extend_from_slice(right.as_bytes());
        Self::hash(&buf)
    }
}

/// SHA-512. The default primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha512Hasher;

impl MerkleHasher for Sha512Hasher {
    const NAME: &'static str = "sha512";

    fn hash(data: &[u8]) -> HashValue {
        let mut hasher = Sha512::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; HASH_LENGTH];
        bytes.copy_from_slice(&result);
        HashValue(bytes)
    }

    fn hash_pair(left: &HashValue, right: &HashValue) -> HashValue {
        let mut hasher = Sha512::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; HASH_LENGTH];
        bytes.copy_from_slice(&result);
        HashValue(bytes)
    }
}

/// BLAKE3 in extendable-output mode, read out to 64 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    const NAME: &'static str = "blake3";

    fn hash(data: &[u8]) -> HashValue {
        let mut hasher = blake3::Hasher::new();
        hasher.update(data);
        let mut bytes = [0u8; HASH_LENGTH];
        hasher.finalize_xof().fill(&mut bytes);
        HashValue(bytes)
    }

    fn hash_pair(left: &HashValue, right: &HashValue) -> HashValue {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        let mut bytes = [0u8; HASH_LENGTH];
        hasher.finalize_xof().fill(&mut bytes);
        HashValue(bytes)
    }
}
