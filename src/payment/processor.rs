// Placeholder payment processor: always succeeds, never contacts a network

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::info;

use crate::config::PaymentConfig;

pub const TRANSACTION_PREFIX: &str = "txn_";
const TRANSACTION_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Card details are passed through untouched.
pub type CardDetails = Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub card_details: CardDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    pub transaction_id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process_payment(&self, amount: f64, card_details: &CardDetails) -> PaymentResult;
}

#[derive(Clone)]
pub struct PaymentProcessor {
    api_key: Option<String>,
}

impl fmt::Debug for PaymentProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProcessor")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PaymentProcessor {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(config.api_key.clone())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl PaymentGateway for PaymentProcessor {
    async fn process_payment(&self, amount: f64, _card_details: &CardDetails) -> PaymentResult {
        let transaction_id = generate_transaction_id();
        info!(amount, %transaction_id, "Payment processed");

        PaymentResult {
            success: true,
            transaction_id,
        }
    }
}

/// `txn_` followed by nine random base-36 characters.
pub fn generate_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TRANSACTION_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", TRANSACTION_PREFIX, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_well_formed(id: &str) -> bool {
        id.strip_prefix(TRANSACTION_PREFIX).is_some_and(|suffix| {
            suffix.len() == TRANSACTION_SUFFIX_LEN
                && suffix.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        })
    }

    #[tokio::test]
    async fn test_process_payment_always_succeeds() {
        let processor = PaymentProcessor::new(Some("pk_test".to_string()));
        let card = serde_json::json!({ "number": "4111111111111111" });

        let result = processor.process_payment(100.0, &card).await;

        assert!(result.success);
        assert!(is_well_formed(&result.transaction_id), "{}", result.transaction_id);
    }

    #[tokio::test]
    async fn test_process_payment_ignores_inputs() {
        let processor = PaymentProcessor::new(None);

        for (amount, card) in [
            (0.0, Value::Null),
            (-5.5, serde_json::json!("not a card")),
            (f64::MAX, serde_json::json!({})),
        ] {
            let result = processor.process_payment(amount, &card).await;
            assert!(result.success);
            assert!(result.transaction_id.starts_with(TRANSACTION_PREFIX));
        }
    }

    #[tokio::test]
    async fn test_sequential_ids_differ() {
        let processor = PaymentProcessor::new(None);
        let card = serde_json::json!({ "number": "4111111111111111" });

        let first = processor.process_payment(100.0, &card).await;
        let second = processor.process_payment(100.0, &card).await;

        assert_ne!(first.transaction_id, second.transaction_id);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = PaymentResult {
            success: true,
            transaction_id: "txn_abc123xyz".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "success": true, "transactionId": "txn_abc123xyz" })
        );
    }

    #[test]
    fn test_request_accepts_opaque_card_details() {
        let request: PaymentRequest = serde_json::from_str(
            r#"{"amount": 100, "cardDetails": {"number": "4111...", "cvc": "123"}}"#,
        )
        .unwrap();

        assert_eq!(request.amount, 100.0);
        assert_eq!(request.card_details["number"], "4111...");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let processor = PaymentProcessor::from_config(&PaymentConfig {
            api_key: Some("sk_live_secret".to_string()),
        });

        assert!(processor.has_api_key());
        assert!(!format!("{:?}", processor).contains("sk_live_secret"));
    }
}
