//! The scoring pipeline: fetch → extract → align → scale → predict →
//! normalize → flag.

pub mod flags;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::explorer::TransactionFetcher;
use crate::features::{self, BALANCE_FEATURE, TX_COUNT_FEATURE};
use crate::model::{ScoringModel, StandardScaler};
use crate::Result;

pub use flags::{generate_risk_flags, RiskFlag, NO_FLAGS};

/// Categorical trust label derived from the bounded score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Safe,
    Neutral,
    Unsafe,
}

impl Label {
    /// Label thresholds over the bounded score. Boundary values belong to
    /// the higher band: 70.00 is Safe, 40.00 is Neutral.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Label::Safe
        } else if score >= 40.0 {
            Label::Neutral
        } else {
            Label::Unsafe
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | Label::Safe => write!(f, "Safe"),
            | Label::Neutral => write!(f, "Neutral"),
            | Label::Unsafe => write!(f, "Unsafe"),
        }
    }
}

/// Clip the raw model output into [0, 100], rounded to two decimal places,
/// and band it into a label.
pub fn normalize(raw: f64) -> (f64, Label) {
    let score = ((raw * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0;
    (score, Label::from_score(score))
}

/// Composed scoring result for one address. Created per request, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub wallet: String,
    pub score: f64,
    pub label: Label,
    pub flags: Vec<String>,
}

/// One synchronous request/response computation: address in, result out.
///
/// The model and scaler are read-only and shared; the only blocking work is
/// the two explorer calls, which run concurrently and independently.
pub struct ScoringPipeline {
    fetcher: Arc<dyn TransactionFetcher>,
    model: Arc<dyn ScoringModel>,
    scaler: Arc<StandardScaler>,
    tx_limit: usize,
}

impl ScoringPipeline {
    pub fn new(
        fetcher: Arc<dyn TransactionFetcher>,
        model: Arc<dyn ScoringModel>,
        scaler: Arc<StandardScaler>,
        tx_limit: usize,
    ) -> Self {
        Self { fetcher, model, scaler, tx_limit }
    }

    /// Score one wallet address end to end.
    ///
    /// Fetch failures are propagated as errors; zero on-chain activity is a
    /// legitimate input and scores normally.
    pub async fn score_wallet(&self, address: &str) -> Result<ScoreResult> {
        let (transactions, balance) = tokio::join!(
            self.fetcher.fetch_transactions(address, self.tx_limit),
            self.fetcher.fetch_balance(address),
        );
        let transactions = transactions?;
        let balance = balance?;

        let record = features::extract(&transactions);

        let mut feature_map = record.as_map();
        feature_map.insert(BALANCE_FEATURE.to_string(), balance as f64);
        feature_map.insert(TX_COUNT_FEATURE.to_string(), transactions.len() as f64);

        let schema = self.model.schema();
        let mut vector = features::align(&feature_map, schema);
        self.scaler.transform(schema, &mut vector)?;

        let raw = self.model.predict(&vector)?;
        let (score, label) = normalize(raw);
        let flags = generate_risk_flags(&record);

        log::info!(
            "scored {}: {:.2} ({}) from {} transactions",
            address,
            score,
            label,
            record.total_transactions
        );

        Ok(ScoreResult { wallet: address.to_string(), score, label, flags })
    }
}
