use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::middleware::auth::TokenVerifier;
use crate::payment::{PaymentGateway, PaymentProcessor};

/// Shared services, built once at startup and cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub verifier: Arc<TokenVerifier>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let processor = PaymentProcessor::from_config(&config.payment);
        if !processor.has_api_key() {
            warn!("PAYMENT_API_KEY is not set");
        }

        Self {
            verifier: Arc::new(TokenVerifier::from_config(&config.auth)),
            payments: Arc::new(processor),
            config,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
