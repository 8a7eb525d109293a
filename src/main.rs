//! Merkle Maze
//!
//! Builds the level's transaction tree, proves one leaf, and prints the
//! submission a verifier contract would receive.
//!
//! Leaves come from the command line (one argument per transaction) or
//! default to the level's four transfers. Engine settings come from
//! `MERKLE_PAIRING_MODE`, `MERKLE_ODD_POLICY` and `MERKLE_HASH`; the leaf
//! to prove from `MERKLE_LEAF_INDEX`.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use merkle_maze::{
    core::hash::to_hex_prefixed,
    proof::merkle::checked_leaf_index,
    LeafSet, MerkleConfig, MerkleEngine, ProofSubmission, VERSION,
};

/// Transactions shown in the level when none are given.
const DEFAULT_TRANSACTIONS: [&str; 4] = [
    "Alice sends 1 ETH to Bob",
    "Charlie sends 0.5 ETH to Dave",
    "Eve sends 2 ETH to Frank",
    "Grace sends 0.3 ETH to Heidi",
];

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Merkle Maze v{}", VERSION);

    let config = MerkleConfig::from_env().context("invalid merkle configuration")?;
    info!("Config: {}", config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let leaves = if args.is_empty() {
        LeafSet::from_items(&DEFAULT_TRANSACTIONS)
    } else {
        LeafSet::from_items(&args)
    };

    let index: i64 = match std::env::var("MERKLE_LEAF_INDEX") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("MERKLE_LEAF_INDEX is not an integer: {:?}", raw))?,
        Err(_) => 1.min(leaves.len() as i64 - 1),
    };

    run(config, &leaves, index)
}

fn run(config: MerkleConfig, leaves: &LeafSet, index: i64) -> Result<()> {
    let engine = MerkleEngine::new(config);
    let digests = leaves.digests(config.hash);

    let tree = engine.build_tree(&digests)?;

    info!("=== Tree ===");
    for leaf in leaves.iter() {
        info!(
            "Leaf {}: {} -> {}",
            leaf.index,
            leaf.as_text().unwrap_or("<binary>"),
            to_hex_prefixed(&digests[leaf.index])
        );
    }
    for (height, level) in tree.levels().iter().enumerate() {
        let nodes: Vec<String> = level.iter().map(|d| hex::encode(&d[..4])).collect();
        info!("Level {} ({} nodes): {}", height, level.len(), nodes.join(" "));
    }
    info!("Root: {}", to_hex_prefixed(&tree.root()));

    info!("=== Proof ===");
    let index = checked_leaf_index(index, tree.leaf_count())?;
    let proof = engine.generate_proof(&tree, index)?;
    for (i, step) in proof.steps.iter().enumerate() {
        info!("Step {}: {:?} {}", i, step.side, to_hex_prefixed(&step.sibling));
    }

    let leaf = digests[index];
    if engine.verify_proof(&leaf, &proof, index, &tree.root()) {
        info!("PROOF VERIFIED: leaf {} is in the tree", index);
    } else {
        warn!("PROOF REJECTED: leaf {} did not reproduce the root", index);
    }

    // A neighbouring leaf must not pass with the same proof
    if let Some(other) = digests.iter().position(|d| *d != leaf) {
        let accepted = engine.verify_proof(&digests[other], &proof, index, &tree.root());
        info!("Substituted leaf {} accepted: {}", other, accepted);
    }

    let submission = ProofSubmission::new(&leaf, &proof, &tree.root());
    println!("{}", submission.to_json_pretty()?);

    Ok(())
}
