//! Merkle Proof System
//!
//! Builds trees over leaf digests and produces inclusion proofs an
//! on-chain verifier accepts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  leaf.rs   - Leaf pre-images and snapshots                  │
//! │  merkle.rs - Tree builder, proof generator, proof verifier  │
//! │  codec.rs  - Flat hex arrays, submissions, JSON / bincode   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod leaf;
pub mod merkle;

// Re-export key types
pub use codec::{CodecError, ProofSubmission, SubmissionParts};
pub use leaf::{Leaf, LeafSet};
pub use merkle::{
    checked_leaf_index, proof_path, MerkleEngine, MerkleError, MerkleProof, MerkleTree,
    ProofStep, Side,
};
