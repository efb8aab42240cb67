//! Rule-based risk flags derived from the feature record.

use serde::{Deserialize, Serialize};

use crate::features::FeatureRecord;

/// Sentinel emitted when no rule fires; the flag set is never empty
pub const NO_FLAGS: &str = "No critical flags";

/// Individual post-hoc risk rules. Rules are independent: all of them are
/// evaluated and every match is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskFlag {
    /// Wallet younger than 3 days with fewer than 5 transactions
    NewWalletLowHistory,
    /// More than 30% of transactions have a reverse-direction counterpart
    CircularTransfers,
    /// Token approvals granted by a wallet that mostly talks to contracts
    SuspiciousApprovals,
}

impl RiskFlag {
    /// Human-readable warning text
    pub fn description(&self) -> &'static str {
        match self {
            | RiskFlag::NewWalletLowHistory => "New Wallet - Low History",
            | RiskFlag::CircularTransfers => "Circular Transfers Detected",
            | RiskFlag::SuspiciousApprovals => "Suspicious Contract Approvals",
        }
    }

    /// Whether this rule fires for the given record
    pub fn matches(&self, record: &FeatureRecord) -> bool {
        match self {
            | RiskFlag::NewWalletLowHistory => {
                record.wallet_age_days < 3 && record.total_transactions < 5
            }
            | RiskFlag::CircularTransfers => record.circular_txn_ratio > 0.3,
            | RiskFlag::SuspiciousApprovals => {
                record.token_approval_count > 0 && record.contract_interaction_ratio > 0.5
            }
        }
    }

    /// All rules, in reporting order
    pub fn all() -> &'static [RiskFlag] {
        &[
            RiskFlag::NewWalletLowHistory,
            RiskFlag::CircularTransfers,
            RiskFlag::SuspiciousApprovals,
        ]
    }
}

/// Evaluate every rule against the record. Never empty: when nothing fires
/// the sentinel entry is returned instead.
pub fn generate_risk_flags(record: &FeatureRecord) -> Vec<String> {
    let flags: Vec<String> = RiskFlag::all()
        .iter()
        .filter(|flag| flag.matches(record))
        .map(|flag| flag.description().to_string())
        .collect();

    if flags.is_empty() {
        vec![NO_FLAGS.to_string()]
    } else {
        flags
    }
}
