//! Proof Wire Format
//!
//! Converts typed proofs to and from the flat shapes external verifiers
//! take. A Solidity verifier receives `(bytes32 leaf, bytes32[] proof,
//! uint256 index)` and checks against a stored root; the side markers are
//! not sent and are rebuilt here from the index and leaf count.
//!
//! JSON is used for submissions (UI and scripts), bincode for compact
//! storage of typed proofs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::config::MerkleConfig;
use crate::core::hash::{parse_digest, to_hex_prefixed, Digest};
use crate::proof::merkle::{
    checked_leaf_index, proof_path, MerkleError, MerkleProof, ProofStep,
};

/// Errors decoding external proof data.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A digest string is not 32 bytes of hex.
    #[error("invalid digest hex: {0:?}")]
    InvalidHex(String),
    /// Sibling array length does not match the tree shape.
    #[error("proof has {got} siblings, expected {expected}")]
    InvalidLength {
        /// Length the tree shape requires.
        expected: usize,
        /// Length supplied.
        got: usize,
    },
    /// Index or leaf set rejected by the engine.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Binary error.
    #[error("binary error: {0}")]
    Binary(#[from] bincode::Error),
}

impl MerkleProof {
    /// Rebuild a typed proof from a flat sibling array.
    ///
    /// Side markers come from the index parity and level widths of a tree
    /// with `leaf_count` leaves under `config`'s odd policy.
    pub fn from_siblings(
        siblings: &[Digest],
        leaf_index: usize,
        leaf_count: usize,
        config: &MerkleConfig,
    ) -> Result<Self, CodecError> {
        if leaf_count == 0 {
            return Err(MerkleError::EmptyInput.into());
        }
        let leaf_index = checked_leaf_index(
            i64::try_from(leaf_index).unwrap_or(i64::MAX),
            leaf_count,
        )?;

        let path = proof_path(config.odd_policy, leaf_index, leaf_count);
        if path.len() != siblings.len() {
            return Err(CodecError::InvalidLength {
                expected: path.len(),
                got: siblings.len(),
            });
        }

        let steps = siblings
            .iter()
            .zip(path)
            .map(|(sibling, side)| ProofStep {
                sibling: *sibling,
                side,
            })
            .collect();

        Ok(Self {
            leaf_index,
            leaf_count,
            steps,
        })
    }

    /// Sibling digests as `0x`-prefixed hex strings.
    pub fn to_hex_array(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|step| to_hex_prefixed(&step.sibling))
            .collect()
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        Ok(bincode::deserialize(data)?)
    }
}

/// Argument set for an on-chain verifier call.
///
/// All digests are `0x`-prefixed hex. `index` is signed so malformed
/// requests from scripts can be reported as out of range instead of
/// failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofSubmission {
    /// Leaf digest being proven.
    pub leaf: String,
    /// Sibling digests, leaf level first.
    pub proof: Vec<String>,
    /// Leaf index in the original ordering.
    pub index: i64,
    /// Expected root.
    pub root: String,
}

/// Typed contents of a [`ProofSubmission`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionParts {
    /// Leaf digest.
    pub leaf: Digest,
    /// Rebuilt typed proof.
    pub proof: MerkleProof,
    /// Leaf index.
    pub index: usize,
    /// Root digest.
    pub root: Digest,
}

impl ProofSubmission {
    /// Build a submission from typed values.
    pub fn new(leaf: &Digest, proof: &MerkleProof, root: &Digest) -> Self {
        Self {
            leaf: to_hex_prefixed(leaf),
            proof: proof.to_hex_array(),
            index: i64::try_from(proof.leaf_index).unwrap_or(i64::MAX),
            root: to_hex_prefixed(root),
        }
    }

    /// Parse back into typed values for a tree of `leaf_count` leaves.
    pub fn into_parts(
        self,
        config: &MerkleConfig,
        leaf_count: usize,
    ) -> Result<SubmissionParts, CodecError> {
        let index = checked_leaf_index(self.index, leaf_count).inspect_err(|_| {
            debug!(index = self.index, leaf_count, "submission index rejected");
        })?;

        let leaf = decode_digest(&self.leaf)?;
        let root = decode_digest(&self.root)?;
        let siblings = self
            .proof
            .iter()
            .map(|s| decode_digest(s))
            .collect::<Result<Vec<_>, _>>()?;

        let proof = MerkleProof::from_siblings(&siblings, index, leaf_count, config)
            .inspect_err(|err| debug!(%err, "submission proof rejected"))?;

        Ok(SubmissionParts {
            leaf,
            proof,
            index,
            root,
        })
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

fn decode_digest(s: &str) -> Result<Digest, CodecError> {
    parse_digest(s).ok_or_else(|| {
        debug!(input = s, "rejected digest hex");
        CodecError::InvalidHex(s.to_string())
    })
}
