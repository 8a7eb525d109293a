//! Merkle Engine Configuration
//!
//! The pairing convention and odd-level policy decide the root a leaf set
//! commits to. Two trees over the same leaves with different settings have
//! different roots, so these are pinned explicitly and must match whatever
//! on-chain verifier consumes the proofs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::hash::HashAlgorithm;

/// Environment variable selecting the pairing convention.
pub const ENV_PAIRING_MODE: &str = "MERKLE_PAIRING_MODE";

/// Environment variable selecting the odd-level policy.
pub const ENV_ODD_POLICY: &str = "MERKLE_ODD_POLICY";

/// Environment variable selecting the hash function.
pub const ENV_HASH: &str = "MERKLE_HASH";

/// How two sibling digests are ordered before hashing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// `H(left || right)` in tree order.
    #[default]
    Positional,
    /// `H(min || max)`, commutative. OpenZeppelin `MerkleProof` style.
    Sorted,
}

/// What happens to the last entry of a level with an odd count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddPolicy {
    /// Pair the last entry with itself.
    #[default]
    Duplicate,
    /// Carry the last entry up unchanged.
    Promote,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Unknown pairing mode name.
    #[error("invalid pairing mode: {0:?} (expected \"positional\" or \"sorted\")")]
    InvalidPairingMode(String),
    /// Unknown odd-level policy name.
    #[error("invalid odd policy: {0:?} (expected \"duplicate\" or \"promote\")")]
    InvalidOddPolicy(String),
    /// Unknown hash function name.
    #[error("invalid hash algorithm: {0:?} (expected \"keccak256\" or \"sha256\")")]
    InvalidHashAlgorithm(String),
}

/// Merkle engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerkleConfig {
    /// Sibling ordering rule.
    pub pairing_mode: PairingMode,
    /// Odd-level handling.
    pub odd_policy: OddPolicy,
    /// Hash function for internal nodes.
    pub hash: HashAlgorithm,
}

impl MerkleConfig {
    /// Positional pairing, duplicate-last, Keccak-256.
    pub fn positional() -> Self {
        Self::default()
    }

    /// Sorted pairing, duplicate-last, Keccak-256.
    pub fn sorted() -> Self {
        Self {
            pairing_mode: PairingMode::Sorted,
            ..Self::default()
        }
    }

    /// Replace the odd-level policy.
    pub fn with_odd_policy(mut self, odd_policy: OddPolicy) -> Self {
        self.odd_policy = odd_policy;
        self
    }

    /// Replace the hash function.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Create config from environment variables.
    ///
    /// Unset variables keep their defaults; invalid values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_PAIRING_MODE) {
            config.pairing_mode = value.parse()?;
            debug!(pairing_mode = %config.pairing_mode, "pairing mode override");
        }
        if let Some(value) = lookup(ENV_ODD_POLICY) {
            config.odd_policy = value.parse()?;
            debug!(odd_policy = %config.odd_policy, "odd policy override");
        }
        if let Some(value) = lookup(ENV_HASH) {
            config.hash = value.parse()?;
            debug!(hash = %config.hash, "hash override");
        }

        Ok(config)
    }
}

impl fmt::Display for MerkleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.pairing_mode, self.odd_policy, self.hash)
    }
}

impl PairingMode {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::Sorted => "sorted",
        }
    }
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PairingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(Self::Positional),
            "sorted" => Ok(Self::Sorted),
            other => Err(ConfigError::InvalidPairingMode(other.to_string())),
        }
    }
}

impl OddPolicy {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::Promote => "promote",
        }
    }
}

impl fmt::Display for OddPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OddPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duplicate" => Ok(Self::Duplicate),
            "promote" => Ok(Self::Promote),
            other => Err(ConfigError::InvalidOddPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = MerkleConfig::default();
        assert_eq!(config.pairing_mode, PairingMode::Positional);
        assert_eq!(config.odd_policy, OddPolicy::Duplicate);
        assert_eq!(config.hash, HashAlgorithm::Keccak256);
        assert_eq!(config, MerkleConfig::positional());
    }

    #[test]
    fn test_sorted_preset() {
        let config = MerkleConfig::sorted();
        assert_eq!(config.pairing_mode, PairingMode::Sorted);
        assert_eq!(config.odd_policy, OddPolicy::Duplicate);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = MerkleConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, MerkleConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = MerkleConfig::from_lookup(lookup_from(&[
            (ENV_PAIRING_MODE, "sorted"),
            (ENV_ODD_POLICY, "Promote"),
            (ENV_HASH, "sha256"),
        ]))
        .unwrap();

        assert_eq!(config.pairing_mode, PairingMode::Sorted);
        assert_eq!(config.odd_policy, OddPolicy::Promote);
        assert_eq!(config.hash, HashAlgorithm::Sha256);
    }

    #[test]
    fn test_from_lookup_rejects_unknown_values() {
        let err = MerkleConfig::from_lookup(lookup_from(&[(ENV_PAIRING_MODE, "random")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPairingMode("random".to_string()));

        let err = MerkleConfig::from_lookup(lookup_from(&[(ENV_ODD_POLICY, "drop")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidOddPolicy("drop".to_string()));
    }

    #[test]
    fn test_config_json_names() {
        let config = MerkleConfig::sorted().with_odd_policy(OddPolicy::Promote);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"pairing_mode":"sorted","odd_policy":"promote","hash":"keccak256"}"#
        );

        let parsed: MerkleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_display() {
        assert_eq!(MerkleConfig::default().to_string(), "positional/duplicate/keccak256");
    }
}
