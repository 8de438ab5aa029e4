use crate::blockchain::core::block::Block;
use crate::error::{ChainError, Result};
use crate::miner::meets_difficulty;

/// Index of the first block whose `prev_hash` does not match the hash of
/// its predecessor, or `None` when linkage is intact.
pub fn first_broken_link(blocks: &[Block]) -> Option<usize> {
    let mut expected = blocks.first()?.hash();
    for (index, block) in blocks.iter().enumerate().skip(1) {
        if block.prev_hash() != expected {
            return Some(index);
        }
        expected = block.hash();
    }
    None
}

/// Check every non-genesis block against the difficulty it was mined at.
///
/// Blocks carrying no difficulty stamp were never mined and fail.
pub fn verify_work(blocks: &[Block]) -> Result<()> {
    for (index, block) in blocks.iter().enumerate().skip(1) {
        let ok = block
            .mined_difficulty()
            .is_some_and(|difficulty| meets_difficulty(&block.hash(), difficulty));
        if !ok {
            return Err(ChainError::InvalidProofOfWork { index });
        }
    }
    Ok(())
}
