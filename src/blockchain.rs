// Thin re-export module: implementation is in `blockchain/core.rs`, split
// into the block model, chain management and linkage validation.

pub mod core;
pub use core::*;
