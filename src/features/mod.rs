//! Behavioral feature schema and extraction.
//!
//! `FEATURE_NAMES` is the single source of truth for the 26 numeric features
//! derived from a transaction history. The names double as model-schema
//! column names, so they must not be renamed without retraining artifacts.

pub mod align;
pub mod extractor;
pub mod selectors;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub use align::align;
pub use extractor::{extract, extract_with_now};

/// Column name of the externally supplied account balance (wei)
pub const BALANCE_FEATURE: &str = "Balance";
/// Column name of the externally supplied transaction count
pub const TX_COUNT_FEATURE: &str = "noOfTrx.1";

/// The 26 derived feature names, in canonical order
pub const FEATURE_NAMES: &[&str] = &[
    "total_transactions",
    "self_transfer_ratio",
    "circular_txn_count",
    "circular_txn_ratio",
    "avg_txn_value_eth",
    "txn_spike_score",
    "value_std_dev",
    "avg_gas_used",
    "avg_gas_price",
    "active_days",
    "wallet_age_days",
    "unique_counterparties",
    "failed_txn_ratio",
    "eth_inflow_outflow_ratio",
    "erc20_txn_count",
    "nft_txn_count",
    "first_txn_time_of_day",
    "erc20_token_diversity",
    "tx_direction_ratio",
    "contract_interaction_ratio",
    "value_entropy",
    "tx_burst_count",
    "average_txn_interval",
    "new_token_interaction_count",
    "token_approval_count",
    "sbt_poap_event_count",
];

/// Number of derived numeric features
pub const FEATURE_COUNT: usize = 26;

/// Fixed-schema feature record for one address.
///
/// Every numeric field is well-defined (zero) for an empty transaction set.
/// `approved_token_list` is the single set-valued feature and is excluded
/// before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub total_transactions: u64,
    pub self_transfer_ratio: f64,
    pub circular_txn_count: u64,
    pub circular_txn_ratio: f64,
    pub avg_txn_value_eth: f64,
    pub txn_spike_score: u64,
    pub value_std_dev: f64,
    pub avg_gas_used: f64,
    pub avg_gas_price: f64,
    pub active_days: u64,
    pub wallet_age_days: i64,
    pub unique_counterparties: u64,
    pub failed_txn_ratio: f64,
    pub eth_inflow_outflow_ratio: f64,
    pub erc20_txn_count: u64,
    pub nft_txn_count: u64,
    pub first_txn_time_of_day: u32,
    pub erc20_token_diversity: u64,
    pub tx_direction_ratio: f64,
    pub contract_interaction_ratio: f64,
    pub value_entropy: f64,
    pub tx_burst_count: u64,
    pub average_txn_interval: f64,
    pub new_token_interaction_count: u64,
    pub token_approval_count: u64,
    pub sbt_poap_event_count: u64,
    /// Addresses granted token approvals (excluded before scoring)
    pub approved_token_list: HashSet<String>,
}

impl FeatureRecord {
    /// Numeric view of the record, keyed by canonical feature name.
    ///
    /// Non-finite values are coerced to zero so the model never sees
    /// NaN/inf, regardless of what upstream data produced them.
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        let mut put = |name: &str, value: f64| {
            map.insert(name.to_string(), if value.is_finite() { value } else { 0.0 });
        };

        put("total_transactions", self.total_transactions as f64);
        put("self_transfer_ratio", self.self_transfer_ratio);
        put("circular_txn_count", self.circular_txn_count as f64);
        put("circular_txn_ratio", self.circular_txn_ratio);
        put("avg_txn_value_eth", self.avg_txn_value_eth);
        put("txn_spike_score", self.txn_spike_score as f64);
        put("value_std_dev", self.value_std_dev);
        put("avg_gas_used", self.avg_gas_used);
        put("avg_gas_price", self.avg_gas_price);
        put("active_days", self.active_days as f64);
        put("wallet_age_days", self.wallet_age_days as f64);
        put("unique_counterparties", self.unique_counterparties as f64);
        put("failed_txn_ratio", self.failed_txn_ratio);
        put("eth_inflow_outflow_ratio", self.eth_inflow_outflow_ratio);
        put("erc20_txn_count", self.erc20_txn_count as f64);
        put("nft_txn_count", self.nft_txn_count as f64);
        put("first_txn_time_of_day", self.first_txn_time_of_day as f64);
        put("erc20_token_diversity", self.erc20_token_diversity as f64);
        put("tx_direction_ratio", self.tx_direction_ratio);
        put("contract_interaction_ratio", self.contract_interaction_ratio);
        put("value_entropy", self.value_entropy);
        put("tx_burst_count", self.tx_burst_count as f64);
        put("average_txn_interval", self.average_txn_interval);
        put("new_token_interaction_count", self.new_token_interaction_count as f64);
        put("token_approval_count", self.token_approval_count as f64);
        put("sbt_poap_event_count", self.sbt_poap_event_count as f64);

        map
    }
}
