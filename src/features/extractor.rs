//! Feature extraction: transaction history → fixed-schema feature record.
//!
//! Extraction is a total function: it never fails, and an empty history
//! yields an all-zero record. Two traversal orders are in play and both are
//! pinned here:
//!
//! - accumulators and circular-pair detection run in *delivery order*
//!   (most-recent-first, as the explorer returns them), so circular counts
//!   are reproducible for a given fetch;
//! - interval, wallet-age and first-transaction statistics run over an
//!   ascending-sorted copy of the timestamps, so "average interval" is the
//!   mean gap between chronologically consecutive transactions.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use ordered_float::OrderedFloat;
use statrs::statistics::Statistics;
use std::collections::{HashMap, HashSet};

use super::{selectors, FeatureRecord};
use crate::explorer::Transaction;

/// Smallest-denomination units per whole coin (wei per ETH)
const WEI_PER_ETH: f64 = 1e18;

/// Extract the feature record for a transaction history, using the current
/// time for wallet-age computation.
pub fn extract(transactions: &[Transaction]) -> FeatureRecord {
    extract_with_now(transactions, Utc::now())
}

/// Extraction with an explicit "now", so age-dependent features are
/// deterministic under test.
pub fn extract_with_now(transactions: &[Transaction], now: DateTime<Utc>) -> FeatureRecord {
    if transactions.is_empty() {
        return FeatureRecord::default();
    }

    let total = transactions.len() as u64;

    let mut txn_values: Vec<f64> = Vec::with_capacity(transactions.len());
    let mut gas_used: Vec<f64> = Vec::with_capacity(transactions.len());
    let mut gas_prices: Vec<f64> = Vec::with_capacity(transactions.len());
    let mut timestamps: Vec<i64> = Vec::with_capacity(transactions.len());

    let mut from_addresses: HashSet<&str> = HashSet::new();
    let mut to_addresses: HashSet<&str> = HashSet::new();
    let mut counterparties: HashSet<&str> = HashSet::new();
    let mut approved_tokens: HashSet<String> = HashSet::new();
    let mut erc20_token_contracts: HashSet<&str> = HashSet::new();
    let mut new_token_contracts: HashSet<&str> = HashSet::new();
    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();

    let mut inflow_wei: f64 = 0.0;
    let mut outflow_wei: f64 = 0.0;
    let mut failed: u64 = 0;
    let mut self_transfers: u64 = 0;
    let mut circular: u64 = 0;
    let mut contract_interactions: u64 = 0;
    let mut erc20_count: u64 = 0;
    let mut nft_count: u64 = 0;
    let mut approval_count: u64 = 0;
    let mut sbt_count: u64 = 0;

    for tx in transactions {
        txn_values.push(tx.value as f64 / WEI_PER_ETH);
        gas_used.push(tx.gas_used as f64);
        gas_prices.push(tx.gas_price as f64);
        timestamps.push(tx.timestamp);

        if !tx.from.is_empty() {
            from_addresses.insert(tx.from.as_str());
            counterparties.insert(tx.from.as_str());
        }
        if !tx.to.is_empty() {
            to_addresses.insert(tx.to.as_str());
            counterparties.insert(tx.to.as_str());
        }

        if tx.from == tx.to {
            self_transfers += 1;
        }

        // A transaction is circular when its reverse pair was already seen
        // earlier in the traversal
        if seen_pairs.contains(&(tx.to.as_str(), tx.from.as_str())) {
            circular += 1;
        } else {
            seen_pairs.insert((tx.from.as_str(), tx.to.as_str()));
        }

        if !tx.to.is_empty() {
            inflow_wei += tx.value as f64;
        }
        if !tx.from.is_empty() {
            outflow_wei += tx.value as f64;
        }
        if tx.is_error {
            failed += 1;
        }

        if tx.input_starts_with(selectors::ERC20_TRANSFER) {
            erc20_count += 1;
            erc20_token_contracts.insert(tx.to.as_str());
        } else if tx.input_starts_with(selectors::TRANSFER_FROM) {
            nft_count += 1;
        }
        if tx.input_starts_with(selectors::APPROVE) {
            approval_count += 1;
            approved_tokens.insert(tx.to.clone());
        }
        if tx.input_starts_with(selectors::MINT)
            || tx.input_starts_with(selectors::SAFE_TRANSFER_FROM)
        {
            sbt_count += 1;
        }
        if tx.contract_address.is_some() {
            contract_interactions += 1;
        }
        if tx.method_id.is_some() {
            new_token_contracts.insert(tx.to.as_str());
        }
    }

    // Temporal statistics over chronologically sorted timestamps
    let mut sorted_ts = timestamps.clone();
    sorted_ts.sort_unstable();
    let earliest = sorted_ts[0];

    let earliest_dt = Utc
        .timestamp_opt(earliest, 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap());
    let wallet_age_days = (now - earliest_dt).num_days();
    let first_txn_time_of_day = earliest_dt.hour();

    let active_days = sorted_ts
        .iter()
        .filter_map(|ts| Utc.timestamp_opt(*ts, 0).single())
        .map(|dt| dt.date_naive())
        .collect::<HashSet<_>>()
        .len() as u64;

    let intervals: Vec<f64> = sorted_ts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64)
        .collect();
    let average_txn_interval = if intervals.is_empty() {
        0.0
    } else {
        Statistics::mean(&intervals)
    };

    // Spike score: largest same-second collision count
    let mut ts_counts: HashMap<i64, u64> = HashMap::new();
    for ts in &timestamps {
        *ts_counts.entry(*ts).or_insert(0) += 1;
    }
    let spike = ts_counts.values().copied().max().unwrap_or(0);

    let total_f = total as f64;
    FeatureRecord {
        total_transactions: total,
        self_transfer_ratio: self_transfers as f64 / total_f,
        circular_txn_count: circular,
        circular_txn_ratio: circular as f64 / total_f,
        avg_txn_value_eth: Statistics::mean(&txn_values),
        txn_spike_score: spike,
        value_std_dev: Statistics::population_std_dev(&txn_values),
        avg_gas_used: Statistics::mean(&gas_used),
        avg_gas_price: Statistics::mean(&gas_prices),
        active_days,
        wallet_age_days,
        unique_counterparties: counterparties.len() as u64,
        failed_txn_ratio: failed as f64 / total_f,
        eth_inflow_outflow_ratio: inflow_wei / (outflow_wei + 1.0),
        erc20_txn_count: erc20_count,
        nft_txn_count: nft_count,
        first_txn_time_of_day,
        erc20_token_diversity: erc20_token_contracts.len() as u64,
        tx_direction_ratio: to_addresses.len() as f64 / (from_addresses.len() as f64 + 1.0),
        contract_interaction_ratio: contract_interactions as f64 / total_f,
        value_entropy: value_entropy(&txn_values),
        tx_burst_count: spike,
        average_txn_interval,
        new_token_interaction_count: new_token_contracts.len() as u64,
        token_approval_count: approval_count,
        sbt_poap_event_count: sbt_count,
        approved_token_list: approved_tokens,
    }
}

/// Shannon entropy (natural log) of the empirical value distribution.
///
/// This is the entropy of the normalized frequency table of observed
/// values, not of value magnitudes: a history of identical values has
/// entropy 0 regardless of how large they are.
fn value_entropy(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<OrderedFloat<f64>, u64> = HashMap::new();
    for v in values {
        *counts.entry(OrderedFloat(*v)).or_insert(0) += 1;
    }

    let n = values.len() as f64;
    -counts
        .values()
        .map(|c| {
            let p = *c as f64 / n;
            p * p.ln()
        })
        .sum::<f64>()
}
