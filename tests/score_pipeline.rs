//! End-to-end pipeline tests with a stub ledger-query collaborator and
//! fixed model/scaler artifacts, so every score is deterministic.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use walletscore::explorer::{Transaction, TransactionFetcher};
use walletscore::server;
use walletscore::features::{BALANCE_FEATURE, FEATURE_NAMES, TX_COUNT_FEATURE};
use walletscore::model::linear::LinearModelArtifact;
use walletscore::model::scaler::ScalerArtifact;
use walletscore::model::{LinearModel, ScoringModel, StandardScaler};
use walletscore::scoring::{Label, ScoringPipeline, NO_FLAGS};
use walletscore::{Error, Result};

struct StubFetcher {
    transactions: Vec<Transaction>,
    balance: u128,
    fail: bool,
}

#[async_trait]
impl TransactionFetcher for StubFetcher {
    async fn fetch_transactions(&self, _address: &str, limit: usize) -> Result<Vec<Transaction>> {
        if self.fail {
            return Err(Error::Fetch("explorer unavailable".to_string()));
        }
        Ok(self.transactions.iter().take(limit).cloned().collect())
    }

    async fn fetch_balance(&self, _address: &str) -> Result<u128> {
        if self.fail {
            return Err(Error::Fetch("explorer unavailable".to_string()));
        }
        Ok(self.balance)
    }
}

fn tx(from: &str, to: &str, value: u128, timestamp: i64) -> Transaction {
    Transaction {
        from: from.to_string(),
        to: to.to_string(),
        value,
        gas_used: 21_000,
        gas_price: 30_000_000_000,
        timestamp,
        is_error: false,
        input: "0x".to_string(),
        contract_address: None,
        method_id: None,
    }
}

/// Full model schema: all 26 derived features plus the two externally
/// supplied columns, mirroring a production artifact.
fn full_schema() -> Vec<String> {
    let mut schema: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    schema.push(BALANCE_FEATURE.to_string());
    schema.push(TX_COUNT_FEATURE.to_string());
    schema
}

fn model_with(weights_for: &[(&str, f64)], intercept: f64) -> LinearModel {
    let schema = full_schema();
    let weights = schema
        .iter()
        .map(|column| {
            weights_for
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, w)| *w)
                .unwrap_or(0.0)
        })
        .collect();

    LinearModel::from_artifact(LinearModelArtifact {
        version: 1,
        features: schema,
        weights,
        intercept,
    })
    .unwrap()
}

fn identity_scaler() -> StandardScaler {
    StandardScaler::from_artifact(ScalerArtifact {
        columns: vec![
            BALANCE_FEATURE.to_string(),
            TX_COUNT_FEATURE.to_string(),
            "avg_txn_value_eth".to_string(),
            "value_std_dev".to_string(),
        ],
        means: vec![0.0; 4],
        stds: vec![1.0; 4],
    })
    .unwrap()
}

fn pipeline(
    fetcher: StubFetcher,
    model: LinearModel,
    scaler: StandardScaler,
) -> ScoringPipeline {
    ScoringPipeline::new(Arc::new(fetcher), Arc::new(model), Arc::new(scaler), 10_000)
}

#[tokio::test]
async fn zero_activity_account_scores_from_intercept_alone() {
    // All-zero feature vector: raw output is exactly the intercept
    let fetcher = StubFetcher { transactions: vec![], balance: 0, fail: false };
    let pipe = pipeline(fetcher, model_with(&[], 0.2), identity_scaler());

    let result = pipe.score_wallet("0xempty").await.unwrap();
    assert_eq!(result.wallet, "0xempty");
    assert_eq!(result.score, 20.0);
    assert_eq!(result.label, Label::Unsafe);
    // Zero age and zero history fire exactly the new-wallet rule
    assert_eq!(result.flags, vec!["New Wallet - Low History".to_string()]);
}

#[tokio::test]
async fn scaler_is_applied_before_prediction() {
    // Weight 1.0 on Balance; the scaler centers the stub balance to zero.
    // If scaling were skipped, raw would be astronomically large.
    let fetcher = StubFetcher {
        transactions: vec![
            tx("0xa", "0xb", 1, 1_000),
            tx("0xa", "0xc", 2, 2_000),
            tx("0xa", "0xd", 3, 3_000),
            tx("0xa", "0xe", 4, 4_000),
        ],
        balance: 5_000,
        fail: false,
    };
    let model = model_with(&[(BALANCE_FEATURE, 1.0), (TX_COUNT_FEATURE, 0.1)], 0.1);
    let scaler = StandardScaler::from_artifact(ScalerArtifact {
        columns: vec![BALANCE_FEATURE.to_string(), TX_COUNT_FEATURE.to_string()],
        means: vec![5_000.0, 0.0],
        stds: vec![1.0, 1.0],
    })
    .unwrap();
    let pipe = pipeline(fetcher, model, scaler);

    // raw = 0.1 + 1.0 * 0 (centered balance) + 0.1 * 4 = 0.5
    let result = pipe.score_wallet("0xactive").await.unwrap();
    assert_eq!(result.score, 50.0);
    assert_eq!(result.label, Label::Neutral);
}

#[tokio::test]
async fn long_history_without_risk_patterns_gets_sentinel_flag() {
    // Month-old wallet with plain transfers: no rule fires
    let day = 86_400;
    let now = chrono::Utc::now().timestamp();
    let transactions: Vec<Transaction> = (0..10i64)
        .map(|i| tx("0xa", "0xb", (i + 1) as u128, now - 40 * day + i * day))
        .collect();

    let fetcher = StubFetcher { transactions, balance: 1, fail: false };
    let pipe = pipeline(fetcher, model_with(&[], 0.8), identity_scaler());

    let result = pipe.score_wallet("0xold").await.unwrap();
    assert_eq!(result.label, Label::Safe);
    assert_eq!(result.flags, vec![NO_FLAGS.to_string()]);
}

#[tokio::test]
async fn circular_heavy_history_is_flagged() {
    let transactions = vec![
        tx("0xa", "0xb", 1, 1_000),
        tx("0xb", "0xa", 1, 2_000),
        tx("0xa", "0xb", 1, 3_000),
        tx("0xb", "0xa", 1, 4_000),
    ];
    let fetcher = StubFetcher { transactions, balance: 0, fail: false };
    let pipe = pipeline(fetcher, model_with(&[], 0.5), identity_scaler());

    let result = pipe.score_wallet("0xwash").await.unwrap();
    // 2 of 4 transactions have a previously-seen reverse pair (ratio 0.5)
    assert!(result.flags.contains(&"Circular Transfers Detected".to_string()));
}

#[tokio::test]
async fn fetch_failure_is_an_error_not_a_zero_score() {
    let fetcher = StubFetcher { transactions: vec![], balance: 0, fail: true };
    let pipe = pipeline(fetcher, model_with(&[], 0.2), identity_scaler());

    let result = pipe.score_wallet("0xdown").await;
    assert!(matches!(result, Err(Error::Fetch(_))));
}

#[tokio::test]
async fn result_serializes_with_public_field_names() {
    let fetcher = StubFetcher { transactions: vec![], balance: 0, fail: false };
    let pipe = pipeline(fetcher, model_with(&[], 0.9), identity_scaler());

    let result = pipe.score_wallet("0xjson").await.unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["wallet"], "0xjson");
    assert_eq!(json["label"], "Safe");
    assert!(json["flags"].as_array().is_some());
    assert!(json["score"].as_f64().is_some());
}

#[test]
fn model_schema_accessor_matches_artifact_order() {
    let model = model_with(&[], 0.0);
    assert_eq!(model.schema(), full_schema().as_slice());
}

#[tokio::test]
async fn preflight_is_answered_before_routing() {
    // Browsers send OPTIONS before a cross-origin JSON POST; the service
    // must answer it itself since no route accepts OPTIONS.
    let fetcher = StubFetcher { transactions: vec![], balance: 0, fail: false };
    let app = server::app(Arc::new(pipeline(fetcher, model_with(&[], 0.2), identity_scaler())));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/score_wallet")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    let methods = headers.get("access-control-allow-methods").unwrap().to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(headers.contains_key("access-control-allow-headers"));
}

#[tokio::test]
async fn post_response_carries_cors_headers() {
    let fetcher = StubFetcher { transactions: vec![], balance: 0, fail: false };
    let app = server::app(Arc::new(pipeline(fetcher, model_with(&[], 0.2), identity_scaler())));

    let request = Request::builder()
        .method("POST")
        .uri("/score_wallet")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"wallet_address": "0xempty"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
}
