//! Transfer records carried by ledger blocks

use serde::Serialize;
use std::fmt;

/// A single transfer of `amount` from `sender` to `receiver`.
///
/// Records are plain values: fields are fixed at construction and only
/// readable afterwards. The [`fmt::Display`] output is the canonical
/// encoding fed into block hashes, so its layout must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    sender: String,
    receiver: String,
    amount: f64,
}

impl Record {
    /// `-0.0` is stored as `0.0` so equal records encode identically.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Record {
            sender: sender.into(),
            receiver: receiver.into(),
            amount: if amount == 0.0 { 0.0 } else { amount },
        }
    }

    /// Placeholder payload stored in the genesis block.
    pub fn genesis() -> Self {
        Record::new("Genesis", "Genesis", 0.0)
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // JSON string escaping is fixed, unlike `Debug` output.
        let sender = serde_json::to_string(&self.sender).map_err(|_| fmt::Error)?;
        let receiver = serde_json::to_string(&self.receiver).map_err(|_| fmt::Error)?;
        write!(
            f,
            "Record {{ sender: {}, receiver: {}, amount: {} }}",
            sender, receiver, self.amount
        )
    }
}
