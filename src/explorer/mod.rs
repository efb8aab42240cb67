//! Ledger-query collaborators: transaction history and balance fetch.

pub mod etherscan;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use etherscan::EtherscanClient;

/// One historical ledger event, as observed on chain. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender address (lowercased)
    pub from: String,
    /// Receiver address (lowercased, empty for contract creations)
    pub to: String,
    /// Transferred value in wei
    pub value: u128,
    /// Gas consumed by the transaction
    pub gas_used: u64,
    /// Gas price in wei
    pub gas_price: u64,
    /// Block timestamp, seconds since epoch
    pub timestamp: i64,
    /// Whether the transaction reverted
    pub is_error: bool,
    /// Raw call-data (`0x`-prefixed hex)
    pub input: String,
    /// Address of the contract deployed by this transaction, if any
    pub contract_address: Option<String>,
    /// Decoded method identifier, if the explorer resolved one
    pub method_id: Option<String>,
}

impl Transaction {
    /// True when the call-data starts with the given 4-byte selector
    pub fn input_starts_with(&self, selector: &str) -> bool {
        self.input.starts_with(selector)
    }
}

/// Ledger-query interface the scoring pipeline depends on.
///
/// Implementations must surface failures explicitly: an `Err` means "could
/// not determine activity", while `Ok(vec![])` means the address genuinely
/// has no transaction history. The two are never interchangeable.
#[async_trait]
pub trait TransactionFetcher: Send + Sync {
    /// Fetch up to `limit` transactions for `address`, most recent first
    async fn fetch_transactions(&self, address: &str, limit: usize) -> Result<Vec<Transaction>>;

    /// Fetch the current balance for `address`, in wei
    async fn fetch_balance(&self, address: &str) -> Result<u128>;
}
