//! Voice provider port
//!
//! The outbound side of the system: placing a call with the external
//! voice platform and polling its current view of a call. The concrete
//! client lives in the infrastructure layer.

use crate::domain::reconcile::ProviderSignal;

/// Everything the provider needs to place a booking call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCallSpec {
    pub phone_number: String,
    pub booking_date: String,
    pub booking_time: String,
    pub num_players: i32,
    pub player_name: String,
    /// Internal call task ID, echoed back in event metadata for
    /// correlation.
    pub internal_call_id: i32,
}

/// Voice provider trait
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VoiceProvider: Send + Sync {
    /// Place an outbound call. Returns the provider-assigned call ID when
    /// the provider included one. No retries; a failure is terminal for
    /// this attempt.
    async fn place_call(&self, spec: &OutboundCallSpec) -> Result<Option<String>, String>;

    /// Fetch the provider's current view of a call, normalized to a
    /// signal.
    async fn fetch_signal(&self, provider_call_id: &str) -> Result<ProviderSignal, String>;
}
