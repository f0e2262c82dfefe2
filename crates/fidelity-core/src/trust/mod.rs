//! Trust service integration.
//!
//! A fidelity score is one input to an identity's trust computation. The
//! service combines it with the agreement rate and witness score and answers
//! with a trust score. [`TrustService`] abstracts the transport so callers
//! can submit without caring whether it goes over HTTP.

pub mod client;
pub mod retry;

pub use client::HttpTrustClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TrustConfig;
use crate::error::TrustError;
use crate::types::FidelityScore;

/// Body of a `POST /compute-trust` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustRequest {
    pub identity_id: String,
    pub agreement_rate: f64,
    pub biometric_fidelity: f64,
    pub witness_score: f64,
}

impl TrustRequest {
    /// Build a request, rejecting an empty identity or any rate outside `[0, 1]`.
    pub fn new(
        identity_id: impl Into<String>,
        agreement_rate: f64,
        biometric_fidelity: f64,
        witness_score: f64,
    ) -> Result<Self, TrustError> {
        let identity_id = identity_id.into();
        if identity_id.trim().is_empty() {
            return Err(TrustError::InvalidRequest(
                "identity_id must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("agreement_rate", agreement_rate),
            ("biometric_fidelity", biometric_fidelity),
            ("witness_score", witness_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrustError::InvalidRequest(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(Self {
            identity_id,
            agreement_rate,
            biometric_fidelity,
            witness_score,
        })
    }

    /// Request for a freshly computed score, using the configured default
    /// agreement rate and witness score.
    pub fn from_score(
        identity_id: impl Into<String>,
        score: &FidelityScore,
        config: &TrustConfig,
    ) -> Result<Self, TrustError> {
        Self::new(
            identity_id,
            config.agreement_rate,
            score.aggregate,
            config.witness_score,
        )
    }
}

/// Response from the trust service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustResponse {
    pub identity_id: String,

    /// Combined trust score in `[0, 1]`
    pub trust_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,

    /// Unix timestamp of the update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<f64>,

    /// Ledger transaction hash, when the update was anchored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Something that can turn a [`TrustRequest`] into a trust score.
#[async_trait]
pub trait TrustService: Send + Sync {
    /// Service name for logging.
    fn name(&self) -> &str;

    async fn compute_trust(&self, request: &TrustRequest) -> Result<TrustResponse, TrustError>;
}
