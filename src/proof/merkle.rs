//! Merkle Tree Engine
//!
//! Binary Merkle tree over caller-supplied leaf digests, with inclusion
//! proofs whose shape matches an on-chain verifier.
//!
//! Two settings decide the root (see [`MerkleConfig`]):
//! - pairing: positional `H(left || right)` or sorted `H(min || max)`
//! - odd levels: duplicate the last entry or promote it unchanged
//!
//! Build, prove and verify are pure functions over immutable values. The
//! only failures are [`MerkleError::EmptyInput`] and
//! [`MerkleError::IndexOutOfRange`]; an invalid proof is a `false`
//! verification result, never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::{MerkleConfig, OddPolicy, PairingMode};
use crate::core::hash::{hash_leaves, hash_pair, Digest};

/// Errors from tree construction and proof generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// Tried to build a tree from zero leaves.
    #[error("no data to prove: leaf list is empty")]
    EmptyInput,
    /// Requested a leaf index outside `0..leaf_count`.
    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange {
        /// Index that was requested.
        index: i64,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },
}

impl MerkleError {
    fn out_of_range(index: usize, leaf_count: usize) -> Self {
        Self::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            leaf_count,
        }
    }
}

/// Which operand a sibling digest is when recombining upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left operand: `H(sibling || current)`.
    Left,
    /// Sibling is the right operand: `H(current || sibling)`.
    Right,
}

/// One element of an inclusion proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest at this level.
    pub sibling: Digest,
    /// Operand position of the sibling.
    pub side: Side,
}

/// Merkle inclusion proof.
///
/// Contains the path from a leaf up to (not including) the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Index of the leaf this proof is for.
    pub leaf_index: usize,
    /// Number of leaves in the tree the proof was taken from.
    pub leaf_count: usize,
    /// Sibling digests from the leaf level upward.
    pub steps: Vec<ProofStep>,
}

impl MerkleProof {
    /// Number of proof elements.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for a single-leaf tree's proof.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sibling digests in proof order, without side markers.
    ///
    /// This is the `bytes32[]` argument of a typical verifier contract.
    pub fn siblings(&self) -> Vec<Digest> {
        self.steps.iter().map(|step| step.sibling).collect()
    }

    /// Recompute the root implied by this proof for `leaf`.
    ///
    /// Returns `None` when the proof's shape does not match the path the
    /// configured odd policy produces for `leaf_index` in a tree of
    /// `leaf_count` leaves.
    pub fn compute_root(&self, config: &MerkleConfig, leaf: &Digest) -> Option<Digest> {
        if self.leaf_count == 0 || self.leaf_index >= self.leaf_count {
            return None;
        }

        let path = proof_path(config.odd_policy, self.leaf_index, self.leaf_count);
        if path.len() != self.steps.len() {
            return None;
        }

        let mut current = *leaf;
        for (step, expected_side) in self.steps.iter().zip(path) {
            if step.side != expected_side {
                return None;
            }
            current = match step.side {
                Side::Left => combine(config, &step.sibling, &current),
                Side::Right => combine(config, &current, &step.sibling),
            };
        }

        Some(current)
    }
}

/// Built Merkle tree.
///
/// Levels are stored bottom-up: index 0 holds the leaf digests, the last
/// level holds only the root. Duplicate-policy padding is never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MerkleTree {
    config: MerkleConfig,
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Root digest.
    pub fn root(&self) -> Digest {
        // A tree always has at least one level with one entry.
        self.levels[self.levels.len() - 1][0]
    }

    /// All levels, leaves first.
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Leaf digests (level 0).
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of combination rounds between the leaves and the root.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> &MerkleConfig {
        &self.config
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn generate_proof(&self, index: usize) -> Result<MerkleProof, MerkleError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(MerkleError::out_of_range(index, leaf_count));
        }

        let mut steps = Vec::with_capacity(self.depth());
        let mut current_index = index;

        for level in &self.levels[..self.depth()] {
            if current_index % 2 == 1 {
                steps.push(ProofStep {
                    sibling: level[current_index - 1],
                    side: Side::Left,
                });
            } else if let Some(sibling) = level.get(current_index + 1) {
                steps.push(ProofStep {
                    sibling: *sibling,
                    side: Side::Right,
                });
            } else if self.config.odd_policy == OddPolicy::Duplicate {
                steps.push(ProofStep {
                    sibling: level[current_index],
                    side: Side::Right,
                });
            }

            current_index /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index,
            leaf_count,
            steps,
        })
    }
}

/// Merkle engine bound to one pairing convention and odd-level policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MerkleEngine {
    config: MerkleConfig,
}

impl MerkleEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: MerkleConfig) -> Self {
        Self { config }
    }

    /// Engine configuration.
    pub fn config(&self) -> &MerkleConfig {
        &self.config
    }

    /// Build a tree from ordered leaf digests.
    ///
    /// A single leaf is its own root.
    pub fn build_tree(&self, leaves: &[Digest]) -> Result<MerkleTree, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let mut levels = vec![leaves.to_vec()];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = self.parent_level(current);
            levels.push(next);
        }

        Ok(MerkleTree {
            config: self.config,
            levels,
        })
    }

    /// Hash raw items with the configured hash function, then build.
    pub fn build_from_data<T: AsRef<[u8]>>(&self, items: &[T]) -> Result<MerkleTree, MerkleError> {
        self.build_tree(&hash_leaves(self.config.hash, items))
    }

    /// Generate an inclusion proof for `leaf_index` in `tree`.
    pub fn generate_proof(
        &self,
        tree: &MerkleTree,
        leaf_index: usize,
    ) -> Result<MerkleProof, MerkleError> {
        tree.generate_proof(leaf_index)
    }

    /// Verify that `leaf` sits at `leaf_index` under `root`.
    ///
    /// Returns `false` for any mismatch: index, proof length, side markers,
    /// or final digest.
    pub fn verify_proof(
        &self,
        leaf: &Digest,
        proof: &MerkleProof,
        leaf_index: usize,
        root: &Digest,
    ) -> bool {
        if proof.leaf_index != leaf_index {
            return false;
        }
        proof.compute_root(&self.config, leaf).as_ref() == Some(root)
    }

    fn parent_level(&self, level: &[Digest]) -> Vec<Digest> {
        level
            .chunks(2)
            .map(|chunk| {
                let left = &chunk[0];
                match (chunk.get(1), self.config.odd_policy) {
                    (Some(right), _) => combine(&self.config, left, right),
                    (None, OddPolicy::Duplicate) => combine(&self.config, left, left),
                    (None, OddPolicy::Promote) => *left,
                }
            })
            .collect()
    }
}

/// Side markers a proof for `leaf_index` must carry in a tree of
/// `leaf_count` leaves.
///
/// Levels where the node is promoted unpaired contribute no entry.
pub fn proof_path(odd_policy: OddPolicy, leaf_index: usize, leaf_count: usize) -> Vec<Side> {
    let mut path = Vec::new();
    let mut index = leaf_index;
    let mut width = leaf_count;

    while width > 1 {
        if index % 2 == 1 {
            path.push(Side::Left);
        } else if index + 1 < width || odd_policy == OddPolicy::Duplicate {
            path.push(Side::Right);
        }
        index /= 2;
        width = width.div_ceil(2);
    }

    path
}

/// Convert an externally supplied signed index into a leaf index.
pub fn checked_leaf_index(index: i64, leaf_count: usize) -> Result<usize, MerkleError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < leaf_count)
        .ok_or(MerkleError::IndexOutOfRange { index, leaf_count })
}

/// Hash two siblings under the configured pairing convention.
fn combine(config: &MerkleConfig, left: &Digest, right: &Digest) -> Digest {
    match config.pairing_mode {
        PairingMode::Positional => hash_pair(config.hash, left, right),
        PairingMode::Sorted if left <= right => hash_pair(config.hash, left, right),
        PairingMode::Sorted => hash_pair(config.hash, right, left),
    }
}
