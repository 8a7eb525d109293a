//! Digest Hashing
//!
//! Provides the fixed-width digest type and the hash functions used to
//! build Merkle trees:
//! - Keccak-256 (matches Solidity `keccak256`, the default)
//! - SHA-256 (for verifiers built on the `sha256` precompile)
//!
//! Leaf digests are plain hashes of the pre-image with no domain
//! separation, so `keccak256(bytes(description))` on-chain produces the
//! same leaf as [`hash_bytes`] here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use sha3::Keccak256;

use super::config::ConfigError;

/// Hash output type (256 bits / 32 bytes).
pub type Digest = [u8; 32];

/// Length of a [`Digest`] in bytes.
pub const DIGEST_LEN: usize = 32;

/// Hash function used for leaves and internal nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Ethereum Keccak-256 (pre-standard SHA-3 padding).
    #[default]
    Keccak256,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keccak256 => "keccak256",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "sha256" => Ok(Self::Sha256),
            other => Err(ConfigError::InvalidHashAlgorithm(other.to_string())),
        }
    }
}

/// Keccak-256 of arbitrary data.
pub fn keccak256(data: &[u8]) -> Digest {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash arbitrary data with the selected algorithm.
pub fn hash_bytes(algorithm: HashAlgorithm, data: &[u8]) -> Digest {
    match algorithm {
        HashAlgorithm::Keccak256 => keccak256(data),
        HashAlgorithm::Sha256 => sha256(data),
    }
}

/// Hash `left || right`.
///
/// Operand order is taken as given; callers apply the pairing convention.
pub fn hash_pair(algorithm: HashAlgorithm, left: &Digest, right: &Digest) -> Digest {
    match algorithm {
        HashAlgorithm::Keccak256 => {
            let mut hasher = Keccak256::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }
    }
}

/// Hash each item into a leaf digest, preserving order.
pub fn hash_leaves<T: AsRef<[u8]>>(algorithm: HashAlgorithm, items: &[T]) -> Vec<Digest> {
    items
        .iter()
        .map(|item| hash_bytes(algorithm, item.as_ref()))
        .collect()
}

/// Encode a digest as `0x`-prefixed lowercase hex.
pub fn to_hex_prefixed(digest: &Digest) -> String {
    format!("0x{}", hex::encode(digest))
}

/// Parse a 32-byte digest from hex, with or without a `0x` prefix.
///
/// Returns `None` for malformed hex or a wrong length.
pub fn parse_digest(s: &str) -> Option<Digest> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(body).ok()?;
    bytes.try_into().ok()
}

// =============================================================================
// TESTS
// =============================================================================
