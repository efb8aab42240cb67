//! Etherscan ledger-query client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{Transaction, TransactionFetcher};
use crate::config::ExplorerConfig;
use crate::{Error, Result};

/// Etherscan reports "no history" as an error-shaped response; it is the one
/// non-OK status that is a successful (empty) result for us.
const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

/// Client for the Etherscan account API
pub struct EtherscanClient {
    client: Client,
    api_url: String,
    api_key: String,
}

/// Raw envelope shared by all Etherscan account endpoints. `result` is a
/// list for txlist, a decimal string for balance, and an error string on
/// failures, so it stays untyped until `status` has been inspected.
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// One transaction as Etherscan serializes it (all numerics are strings)
#[derive(Debug, Deserialize)]
struct RawTransaction {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(rename = "gasUsed", default)]
    gas_used: String,
    #[serde(rename = "gasPrice", default)]
    gas_price: String,
    #[serde(rename = "timeStamp", default)]
    time_stamp: String,
    #[serde(rename = "isError", default)]
    is_error: String,
    #[serde(default)]
    input: String,
    #[serde(rename = "contractAddress", default)]
    contract_address: String,
    #[serde(rename = "methodId", default)]
    method_id: String,
}

impl RawTransaction {
    fn into_transaction(self) -> Transaction {
        Transaction {
            from: self.from.to_lowercase(),
            to: self.to.to_lowercase(),
            value: self.value.parse().unwrap_or(0),
            gas_used: self.gas_used.parse().unwrap_or(0),
            gas_price: self.gas_price.parse().unwrap_or(0),
            timestamp: self.time_stamp.parse().unwrap_or(0),
            is_error: self.is_error == "1",
            input: self.input,
            contract_address: none_if_empty(self.contract_address),
            method_id: none_if_empty(self.method_id.to_lowercase()),
        }
    }
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl EtherscanClient {
    /// Create a new Etherscan client from explorer configuration
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<EtherscanResponse> {
        let response = self
            .client
            .get(&self.api_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("explorer returned HTTP {}", status)));
        }

        let envelope = response.json::<EtherscanResponse>().await?;
        Ok(envelope)
    }
}

#[async_trait]
impl TransactionFetcher for EtherscanClient {
    async fn fetch_transactions(&self, address: &str, limit: usize) -> Result<Vec<Transaction>> {
        let envelope = self
            .get(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "desc"),
            ])
            .await?;

        if envelope.status != "1" {
            // Zero activity is a successful result, everything else is not
            if envelope.message == NO_TRANSACTIONS_MESSAGE {
                log::debug!("no transactions found for {}", address);
                return Ok(Vec::new());
            }
            return Err(Error::Fetch(format!(
                "txlist failed for {}: {} ({})",
                address, envelope.message, envelope.result
            )));
        }

        let raw: Vec<RawTransaction> = serde_json::from_value(envelope.result)
            .map_err(|e| Error::Fetch(format!("malformed txlist payload: {}", e)))?;

        let transactions: Vec<Transaction> = raw
            .into_iter()
            .take(limit)
            .map(RawTransaction::into_transaction)
            .collect();

        log::debug!("fetched {} transactions for {}", transactions.len(), address);
        Ok(transactions)
    }

    async fn fetch_balance(&self, address: &str) -> Result<u128> {
        let envelope = self
            .get(&[
                ("module", "account"),
                ("action", "balance"),
                ("address", address),
                ("tag", "latest"),
            ])
            .await?;

        if envelope.status != "1" {
            return Err(Error::Fetch(format!(
                "balance failed for {}: {} ({})",
                address, envelope.message, envelope.result
            )));
        }

        let balance_str = envelope
            .result
            .as_str()
            .ok_or_else(|| Error::Fetch("balance result is not a string".to_string()))?;

        balance_str
            .parse::<u128>()
            .map_err(|e| Error::Fetch(format!("unparseable balance {:?}: {}", balance_str, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_transaction_conversion() {
        let raw = RawTransaction {
            from: "0xABCD".to_string(),
            to: "0xEF01".to_string(),
            value: "1500000000000000000".to_string(),
            gas_used: "21000".to_string(),
            gas_price: "30000000000".to_string(),
            time_stamp: "1700000000".to_string(),
            is_error: "1".to_string(),
            input: "0xa9059cbb00".to_string(),
            contract_address: String::new(),
            method_id: "0xA9059CBB".to_string(),
        };

        let tx = raw.into_transaction();
        assert_eq!(tx.from, "0xabcd");
        assert_eq!(tx.to, "0xef01");
        assert_eq!(tx.value, 1_500_000_000_000_000_000);
        assert_eq!(tx.gas_used, 21_000);
        assert_eq!(tx.timestamp, 1_700_000_000);
        assert!(tx.is_error);
        assert_eq!(tx.contract_address, None);
        assert_eq!(tx.method_id.as_deref(), Some("0xa9059cbb"));
    }

    #[test]
    fn test_unparseable_numerics_become_zero() {
        let raw = RawTransaction {
            from: String::new(),
            to: String::new(),
            value: "not-a-number".to_string(),
            gas_used: String::new(),
            gas_price: String::new(),
            time_stamp: String::new(),
            is_error: "0".to_string(),
            input: String::new(),
            contract_address: String::new(),
            method_id: String::new(),
        };

        let tx = raw.into_transaction();
        assert_eq!(tx.value, 0);
        assert_eq!(tx.gas_used, 0);
        assert!(!tx.is_error);
        assert_eq!(tx.method_id, None);
    }

    #[test]
    fn test_envelope_parses_error_shape() {
        // status "0" responses carry a string in `result`
        let json = r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#;
        let envelope: EtherscanResponse = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.status, "0");
        assert_eq!(envelope.result.as_str(), Some("Max rate limit reached"));
    }

    #[test]
    fn test_envelope_parses_txlist_shape() {
        let json = r#"{
            "status":"1","message":"OK",
            "result":[{"from":"0xa","to":"0xb","value":"1","gasUsed":"2","gasPrice":"3",
                       "timeStamp":"4","isError":"0","input":"0x","contractAddress":"","methodId":""}]
        }"#;
        let envelope: EtherscanResponse = serde_json::from_str(json).unwrap();
        let raw: Vec<RawTransaction> = serde_json::from_value(envelope.result).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].value, "1");
    }
}
