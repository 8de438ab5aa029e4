//! Bankchain - an in-memory, tamper-evident ledger of transfer records
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`record`] - Transfer records and their canonical encoding
//! - [`blockchain`] - Blocks, the ledger and linkage validation
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work nonce search
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Interactive session used by the `bankchain` binary
//!
//! # Example
//!
//! ```
//! use bankchain::blockchain::{Block, Ledger};
//! use bankchain::record::Record;
//!
//! let mut ledger = Ledger::new(1).unwrap();
//! let candidate = Block::new(Record::new("A", "B", 10.5), 1, ledger.tail_hash());
//! ledger.add_block(candidate);
//! assert!(ledger.tail().hash().starts_with('0'));
//! assert!(ledger.is_valid());
//! ```

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod record;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
