//! Core primitives.
//!
//! Digest hashing and the configuration that pins how trees are built.

pub mod config;
pub mod hash;

// Re-export core types
pub use config::{ConfigError, MerkleConfig, OddPolicy, PairingMode};
pub use hash::{Digest, HashAlgorithm};
