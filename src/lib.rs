//! # Merkle Maze
//!
//! Merkle tree engine for the Merkle Maze level: build a tree over
//! transaction leaves, prove one leaf's inclusion, and verify proofs the
//! same way the level's verifier contract does.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MERKLE MAZE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── hash.rs     - Digest type, Keccak-256 / SHA-256         │
//! │  └── config.rs   - Pairing mode, odd policy, env loading     │
//! │                                                              │
//! │  proof/          - Merkle engine                             │
//! │  ├── leaf.rs     - Leaf pre-images                           │
//! │  ├── merkle.rs   - Build / prove / verify                    │
//! │  └── codec.rs    - Verifier-facing wire format               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Verifier Compatibility
//!
//! The root depends on two settings that must match the contract that
//! checks the proofs:
//! - [`PairingMode::Positional`] hashes `left || right` in tree order,
//!   [`PairingMode::Sorted`] hashes the smaller digest first
//! - [`OddPolicy::Duplicate`] pairs an unpaired node with itself,
//!   [`OddPolicy::Promote`] carries it up unchanged
//!
//! ```
//! use merkle_maze::{MerkleConfig, MerkleEngine};
//!
//! let engine = MerkleEngine::new(MerkleConfig::positional());
//! let tree = engine.build_from_data(&["a", "b", "c"]).unwrap();
//! let proof = engine.generate_proof(&tree, 2).unwrap();
//! let leaf = tree.leaves()[2];
//! assert!(engine.verify_proof(&leaf, &proof, 2, &tree.root()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod proof;

// Re-export commonly used types
pub use crate::core::config::{ConfigError, MerkleConfig, OddPolicy, PairingMode};
pub use crate::core::hash::{Digest, HashAlgorithm};
pub use crate::proof::codec::{CodecError, ProofSubmission};
pub use crate::proof::leaf::{Leaf, LeafSet};
pub use crate::proof::merkle::{MerkleEngine, MerkleError, MerkleProof, MerkleTree, ProofStep, Side};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
