use crate::blockchain::core::block::Block;
use crate::blockchain::core::validation;
use crate::error::{ChainError, Result};
use crate::miner::{mine_block_with_report, MiningReport};
use tracing::{debug, info, warn};

/// Difficulty used by [`Ledger::default`].
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Largest satisfiable difficulty: the length of a hex SHA-256 digest.
pub const MAX_DIFFICULTY: u32 = 64;

/// Append-only sequence of blocks, genesis first.
///
/// `difficulty` only affects future mining; blocks already in the chain
/// keep whatever difficulty they were mined at.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Ledger {
    chain: Vec<Block>,
    difficulty: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger {
            chain: vec![Block::genesis()],
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl Ledger {
    /// Create a ledger holding only a fresh genesis block.
    pub fn new(difficulty: u32) -> Result<Self> {
        let mut ledger = Ledger::default();
        ledger.set_difficulty(difficulty)?;
        Ok(ledger)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false: the genesis block is never removed.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    /// Mutable access to a stored block, for tamper simulations.
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.chain.get_mut(index)
    }

    pub fn tail(&self) -> &Block {
        // The chain is created with a genesis block and never shrinks.
        &self.chain[self.chain.len() - 1]
    }

    /// Hash of the last block; the `prev_hash` a new candidate should carry.
    pub fn tail_hash(&self) -> String {
        self.tail().hash()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u32) -> Result<()> {
        if difficulty > MAX_DIFFICULTY {
            return Err(ChainError::InvalidDifficulty {
                requested: difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        if difficulty != self.difficulty {
            debug!(from = self.difficulty, to = difficulty, "difficulty changed");
        }
        self.difficulty = difficulty;
        Ok(())
    }

    /// Mine `block` against the current difficulty without appending it.
    pub fn proof_of_work(&self, block: Block) -> Block {
        mine_block_with_report(block, self.difficulty).0
    }

    /// Mine the candidate and append it.
    ///
    /// The caller sets `prev_hash` (normally to [`Ledger::tail_hash`]);
    /// linkage is not checked here, see [`Ledger::is_valid`].
    pub fn add_block(&mut self, candidate: Block) {
        self.add_block_with_report(candidate);
    }

    pub fn add_block_with_report(&mut self, candidate: Block) -> MiningReport {
        let (block, report) = mine_block_with_report(candidate, self.difficulty);
        self.chain.push(block);
        info!(index = self.chain.len() - 1, attempts = report.attempts, "block appended");
        report
    }

    /// True when every block's `prev_hash` matches the hash of the block
    /// before it. Proof-of-work is not re-checked; see [`Ledger::verify_work`].
    pub fn is_valid(&self) -> bool {
        self.first_broken_link().is_none()
    }

    pub fn first_broken_link(&self) -> Option<usize> {
        let broken = validation::first_broken_link(&self.chain);
        if let Some(index) = broken {
            warn!(index, "chain linkage broken");
        }
        broken
    }

    /// Check each mined block against the difficulty it was mined at.
    pub fn verify_work(&self) -> Result<()> {
        validation::verify_work(&self.chain)
    }
}
