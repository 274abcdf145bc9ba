//! Vapi API client
//!
//! One bounded request per operation: no retries, no backoff. A failed
//! provider call is recorded on the call task by the caller, never
//! re-attempted here.

use crate::config::VapiConfig;
use crate::domain::provider::{OutboundCallSpec, VoiceProvider};
use crate::domain::reconcile::ProviderSignal;
use crate::infrastructure::vapi::types::{CreateCallRequest, VapiCall};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

const CREATE_CALL_TIMEOUT: Duration = Duration::from_secs(30);
const GET_CALL_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum VapiError {
    #[error("request to voice provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("voice provider returned {status}: {body}")]
    Api { status: u16, body: String },
}

pub struct VapiClient {
    config: VapiConfig,
    http: reqwest::Client,
}

impl VapiClient {
    pub fn new(config: VapiConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Place an outbound booking call. Returns the provider's call
    /// object; its ID is how all later events are correlated.
    pub async fn create_outbound_call(
        &self,
        spec: &OutboundCallSpec,
    ) -> Result<VapiCall, VapiError> {
        debug!(
            "Placing outbound call to {} for task {}",
            spec.phone_number, spec.internal_call_id
        );

        let payload = CreateCallRequest::from_spec(&self.config, spec);
        let response = self
            .http
            .post(format!("{}/call", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .timeout(CREATE_CALL_TIMEOUT)
            .send()
            .await?;

        Self::decode_call(response).await
    }

    /// Fetch the provider's current representation of a call.
    pub async fn get_call(&self, provider_call_id: &str) -> Result<VapiCall, VapiError> {
        debug!("Fetching provider call {}", provider_call_id);

        let response = self
            .http
            .get(format!("{}/call/{}", self.config.base_url, provider_call_id))
            .bearer_auth(&self.config.api_key)
            .timeout(GET_CALL_TIMEOUT)
            .send()
            .await?;

        Self::decode_call(response).await
    }

    async fn decode_call(response: reqwest::Response) -> Result<VapiCall, VapiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Voice provider returned {}: {}", status, body);
            return Err(VapiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<VapiCall>().await?)
    }
}

#[async_trait]
impl VoiceProvider for VapiClient {
    async fn place_call(&self, spec: &OutboundCallSpec) -> Result<Option<String>, String> {
        self.create_outbound_call(spec)
            .await
            .map(|call| call.id)
            .map_err(|e| e.to_string())
    }

    async fn fetch_signal(&self, provider_call_id: &str) -> Result<ProviderSignal, String> {
        self.get_call(provider_call_id)
            .await
            .map(|call| call.signal())
            .map_err(|e| e.to_string())
    }
}
