//! Proof-of-work search over the block nonce

use crate::blockchain::Block;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of a completed proof-of-work search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningReport {
    /// Number of hashes computed, including the successful one.
    pub attempts: u64,
    pub elapsed: Duration,
}

/// True when `hash` starts with `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Increment the nonce until the block hash meets `difficulty`.
///
/// The search starts from the block's current nonce and has no upper
/// bound; the expected cost grows as 16^difficulty.
pub fn mine_block(block: Block, difficulty: u32) -> Block {
    mine_block_with_report(block, difficulty).0
}

pub fn mine_block_with_report(mut block: Block, difficulty: u32) -> (Block, MiningReport) {
    debug!(difficulty, start_nonce = block.nonce(), "starting proof-of-work");
    let start = Instant::now();
    let mut attempts = 1u64;
    let mut hash = block.hash();

    while !meets_difficulty(&hash, difficulty) {
        block.increment_nonce();
        attempts += 1;
        hash = block.hash();
    }

    block.stamp_difficulty(difficulty);
    let report = MiningReport {
        attempts,
        elapsed: start.elapsed(),
    };
    info!(
        difficulty,
        nonce = block.nonce(),
        attempts,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "proof-of-work found {}",
        hash
    );
    (block, report)
}
