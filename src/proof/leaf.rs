//! Leaf Pre-images
//!
//! Keeps the raw data behind each leaf digest together with its position,
//! so a caller can show what a proof is proving and re-hash it on demand.

use serde::{Deserialize, Serialize};

use crate::core::hash::{hash_bytes, Digest, HashAlgorithm};

/// A leaf pre-image and its index in the input ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// Position in the original ordering.
    pub index: usize,
    /// Raw bytes that get hashed into the leaf digest.
    pub data: Vec<u8>,
}

impl Leaf {
    /// Leaf digest under `algorithm`.
    pub fn digest(&self, algorithm: HashAlgorithm) -> Digest {
        hash_bytes(algorithm, &self.data)
    }

    /// Data as UTF-8, if it is valid text.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Immutable snapshot of leaves taken when a level starts.
///
/// Changing the leaf set means taking a new snapshot and building a new tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafSet {
    leaves: Vec<Leaf>,
}

impl LeafSet {
    /// Snapshot items in order, assigning indices from zero.
    pub fn from_items<T: AsRef<[u8]>>(items: &[T]) -> Self {
        let leaves = items
            .iter()
            .enumerate()
            .map(|(index, item)| Leaf {
                index,
                data: item.as_ref().to_vec(),
            })
            .collect();
        Self { leaves }
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// True when the snapshot holds no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Leaf at `index`.
    pub fn get(&self, index: usize) -> Option<&Leaf> {
        self.leaves.get(index)
    }

    /// Iterate leaves in order.
    pub fn iter(&self) -> impl Iterator<Item = &Leaf> {
        self.leaves.iter()
    }

    /// Leaf digests in order.
    pub fn digests(&self, algorithm: HashAlgorithm) -> Vec<Digest> {
        self.leaves.iter().map(|leaf| leaf.digest(algorithm)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::{hash_leaves, keccak256};

    #[test]
    fn test_indices_follow_input_order() {
        let set = LeafSet::from_items(&["first", "second", "third"]);

        assert_eq!(set.len(), 3);
        for (i, leaf) in set.iter().enumerate() {
            assert_eq!(leaf.index, i);
        }
        assert_eq!(set.get(1).and_then(Leaf::as_text), Some("second"));
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_digests_match_plain_hash() {
        let items = ["Alice sends 1 ETH to Bob", "Eve sends 2 ETH to Frank"];
        let set = LeafSet::from_items(&items);

        assert_eq!(
            set.digests(HashAlgorithm::Keccak256),
            hash_leaves(HashAlgorithm::Keccak256, &items)
        );
        assert_eq!(
            set.get(0).unwrap().digest(HashAlgorithm::Keccak256),
            keccak256(items[0].as_bytes())
        );
    }

    #[test]
    fn test_empty_set() {
        let set = LeafSet::from_items::<&str>(&[]);
        assert!(set.is_empty());
        assert!(set.digests(HashAlgorithm::Sha256).is_empty());
    }

    #[test]
    fn test_binary_leaf_has_no_text() {
        let set = LeafSet::from_items(&[vec![0xffu8, 0xfe]]);
        assert_eq!(set.get(0).unwrap().as_text(), None);
    }
}
