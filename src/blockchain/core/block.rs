use crate::record::Record;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sha2::{Digest, Sha256};

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";

/// Creator id of the genesis block.
pub const GENESIS_CREATOR_ID: u64 = 0;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Block {
    record: Record,
    creator_id: u64,
    prev_hash: String,
    timestamp: DateTime<Utc>,
    nonce: u64,
    /// Difficulty in force when the block was mined. Bookkeeping only, not hashed.
    mined_difficulty: Option<u32>,
}

impl Block {
    /// Build a candidate block. The timestamp is taken now and frozen.
    pub fn new(record: Record, creator_id: u64, prev_hash: impl Into<String>) -> Self {
        Self::with_timestamp(record, creator_id, prev_hash, Utc::now())
    }

    /// Build a candidate block with an explicit timestamp.
    ///
    /// The timestamp is truncated to milliseconds so the stored value and
    /// its hashed text form always agree.
    pub fn with_timestamp(
        record: Record,
        creator_id: u64,
        prev_hash: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Block {
            record,
            creator_id,
            prev_hash: prev_hash.into(),
            timestamp: timestamp.trunc_subsecs(3),
            nonce: 0,
            mined_difficulty: None,
        }
    }

    pub fn genesis() -> Self {
        Block::new(Record::genesis(), GENESIS_CREATOR_ID, GENESIS_PREV_HASH)
    }

    /// Hex-encoded SHA-256 of the block contents.
    ///
    /// Inputs are fed in a fixed order: record encoding, creator id,
    /// timestamp, previous hash, nonce. Changing the order invalidates
    /// every block already mined.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.record.to_string().as_bytes());
        hasher.update(self.creator_id.to_string().as_bytes());
        hasher.update(self.timestamp_text().as_bytes());
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(self.nonce.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Timestamp in the exact text form used by [`Block::hash`].
    pub fn timestamp_text(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn creator_id(&self) -> u64 {
        self.creator_id
    }

    pub fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    pub fn set_prev_hash(&mut self, prev_hash: impl Into<String>) {
        self.prev_hash = prev_hash.into();
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn mined_difficulty(&self) -> Option<u32> {
        self.mined_difficulty
    }

    pub(crate) fn increment_nonce(&mut self) {
        self.nonce += 1;
    }

    pub(crate) fn stamp_difficulty(&mut self, difficulty: u32) {
        self.mined_difficulty = Some(difficulty);
    }
}
