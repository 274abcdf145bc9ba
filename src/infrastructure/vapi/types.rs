//! Vapi API wire types
//!
//! Outbound: the call-creation payload, typed with the provider's
//! camelCase field names. Inbound: webhook events and polled call
//! snapshots. Inbound payloads are deeply nested and loosely structured,
//! so every nested field decodes as optional and missing booleans
//! default to false; the provider's schema is not trusted.

use crate::config::VapiConfig;
use crate::domain::provider::OutboundCallSpec;
use crate::domain::reconcile::{CallOutcome, ProviderSignal};
use serde::{Deserialize, Serialize};

/// Voice used for the booking agent (LMNT)
const LMNT_VOICE_ID: &str = "ec126bc2-46e0-4c66-a730-2889cc6cad8d";

// ---------------------------------------------------------------------
// Outbound call creation
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallRequest {
    pub phone_number_id: String,
    pub customer: Customer,
    pub assistant: Assistant,
    pub metadata: OutboundMetadata,
}

#[derive(Debug, Serialize)]
pub struct Customer {
    pub number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub model: AssistantModel,
    pub voice: AssistantVoice,
    pub first_message: String,
    pub end_call_message: String,
    pub analysis_plan: AnalysisPlan,
    pub server_url: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantModel {
    pub provider: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantVoice {
    pub provider: String,
    pub voice_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPlan {
    pub structured_data_prompt: String,
    pub structured_data_schema: serde_json::Value,
    pub summary_prompt: String,
}

/// Correlation metadata echoed back by the provider in event payloads.
/// The key is our own, so it stays snake_case.
#[derive(Debug, Serialize)]
pub struct OutboundMetadata {
    pub call_id: String,
}

fn plural(n: i32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn build_system_prompt(config: &VapiConfig, spec: &OutboundCallSpec) -> String {
    format!(
        "You are a polite phone assistant calling {course} to book a tee time.\n\
         Book: {date} at {time} for {players} player{s} under the name {name}.\n\
         - If the exact time is unavailable, accept the closest available time\n\
         - Confirm the details back including any confirmation number\n\
         - If you reach voicemail, leave a message with the booking request and hang up\n\
         - Never agree to charges beyond the standard tee time fee\n\
         - Be concise and professional",
        course = config.course_name,
        date = spec.booking_date,
        time = spec.booking_time,
        players = spec.num_players,
        s = plural(spec.num_players),
        name = spec.player_name,
    )
}

impl CreateCallRequest {
    pub fn from_spec(config: &VapiConfig, spec: &OutboundCallSpec) -> Self {
        let first_message = format!(
            "Hi, I'd like to book a tee time for {players} player{s} on {date} at {time}, \
             please. The reservation would be under the name {name}.",
            players = spec.num_players,
            s = plural(spec.num_players),
            date = spec.booking_date,
            time = spec.booking_time,
            name = spec.player_name,
        );

        Self {
            phone_number_id: config.phone_number_id.clone(),
            customer: Customer {
                number: spec.phone_number.clone(),
            },
            assistant: Assistant {
                model: AssistantModel {
                    provider: "openai".to_string(),
                    model: "gpt-4o".to_string(),
                    messages: vec![ChatMessage {
                        role: "system".to_string(),
                        content: build_system_prompt(config, spec),
                    }],
                },
                voice: AssistantVoice {
                    provider: "lmnt".to_string(),
                    voice_id: LMNT_VOICE_ID.to_string(),
                },
                first_message,
                end_call_message: "Thank you, goodbye!".to_string(),
                analysis_plan: AnalysisPlan {
                    structured_data_prompt: "Extract the following from the call:\n\
                         - booking_confirmed: boolean\n\
                         - confirmed_date: string or null\n\
                         - confirmed_time: string or null\n\
                         - confirmation_number: string or null"
                        .to_string(),
                    structured_data_schema: serde_json::json!({
                        "type": "object",
                        "properties": {
                            "booking_confirmed": {"type": "boolean"},
                            "confirmed_date": {"type": "string"},
                            "confirmed_time": {"type": "string"},
                            "confirmation_number": {"type": "string"},
                        },
                    }),
                    summary_prompt: "Summarize the call outcome in 1-2 sentences. \
                         Include whether the tee time was booked and any key details."
                        .to_string(),
                },
                server_url: format!("{}/webhooks/vapi", config.server_base_url),
            },
            metadata: OutboundMetadata {
                call_id: spec.internal_call_id.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------
// Inbound: polled call snapshots and webhook events
// ---------------------------------------------------------------------

/// Structured analysis of an ended call, generated by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VapiAnalysis {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "structuredData", default)]
    pub structured_data: Option<StructuredData>,
}

/// Fields extracted from the transcript by the provider's analysis plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredData {
    #[serde(default)]
    pub booking_confirmed: Option<bool>,
    #[serde(default)]
    pub confirmed_date: Option<String>,
    #[serde(default)]
    pub confirmed_time: Option<String>,
    #[serde(default)]
    pub confirmation_number: Option<String>,
}

/// Provider's representation of a call, as returned by `GET /call/{id}`
/// and embedded in the call-creation response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VapiCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(rename = "endedReason", default)]
    pub ended_reason: Option<String>,
    #[serde(default)]
    pub analysis: Option<VapiAnalysis>,
}

fn is_ongoing_status(status: &str) -> bool {
    matches!(status, "queued" | "ringing" | "in-progress" | "forwarding")
}

fn extract_outcome(
    transcript: &Option<String>,
    ended_reason: &Option<String>,
    analysis: &Option<VapiAnalysis>,
) -> CallOutcome {
    CallOutcome {
        transcript: transcript.clone().unwrap_or_default(),
        summary: analysis
            .as_ref()
            .and_then(|a| a.summary.clone())
            .unwrap_or_default(),
        ended_reason: ended_reason.clone().unwrap_or_default(),
        booking_confirmed: analysis
            .as_ref()
            .and_then(|a| a.structured_data.as_ref())
            .and_then(|s| s.booking_confirmed)
            .unwrap_or(false),
    }
}

impl VapiCall {
    /// Normalize this snapshot into a provider signal.
    pub fn signal(&self) -> ProviderSignal {
        match self.status.as_deref() {
            Some("ended") => ProviderSignal::Ended(extract_outcome(
                &self.transcript,
                &self.ended_reason,
                &self.analysis,
            )),
            Some(status) if is_ongoing_status(status) => ProviderSignal::Ongoing,
            _ => ProviderSignal::Unrecognized,
        }
    }
}

/// Webhook event envelope pushed by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub message: WebhookMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub call: Option<WebhookCall>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(rename = "endedReason", default)]
    pub ended_reason: Option<String>,
    #[serde(default)]
    pub analysis: Option<VapiAnalysis>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Option<WebhookMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookMetadata {
    #[serde(default)]
    pub call_id: Option<String>,
}

impl WebhookEnvelope {
    /// Internal call task ID echoed back from the outbound metadata, when
    /// present and parseable.
    pub fn correlation_id(&self) -> Option<i32> {
        self.message
            .call
            .as_ref()
            .and_then(|c| c.metadata.as_ref())
            .and_then(|m| m.call_id.as_deref())
            .and_then(|id| id.parse().ok())
    }

    /// Provider-assigned call ID carried by the event.
    pub fn provider_call_id(&self) -> Option<&str> {
        self.message
            .call
            .as_ref()
            .and_then(|c| c.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Normalize this event into a provider signal. Only `status-update`
    /// and `end-of-call-report` events are acted on; everything else is
    /// unrecognized and ignored upstream.
    pub fn signal(&self) -> ProviderSignal {
        match self.message.kind.as_str() {
            "status-update" => match self.message.status.as_deref() {
                Some(status) if is_ongoing_status(status) => ProviderSignal::Ongoing,
                _ => ProviderSignal::Unrecognized,
            },
            "end-of-call-report" => ProviderSignal::Ended(extract_outcome(
                &self.message.transcript,
                &self.message.ended_reason,
                &self.message.analysis,
            )),
            _ => ProviderSignal::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> OutboundCallSpec {
        OutboundCallSpec {
            phone_number: "555-1234".to_string(),
            booking_date: "2024-06-01".to_string(),
            booking_time: "14:00".to_string(),
            num_players: 4,
            player_name: "Alex".to_string(),
            internal_call_id: 42,
        }
    }

    #[test]
    fn test_create_call_request_wire_shape() {
        let config = VapiConfig {
            api_key: "key".to_string(),
            phone_number_id: "pn-123".to_string(),
            base_url: "https://api.vapi.ai".to_string(),
            server_base_url: "https://example.com".to_string(),
            course_name: "Stanford Golf Course".to_string(),
        };
        let value = serde_json::to_value(CreateCallRequest::from_spec(&config, &spec())).unwrap();

        assert_eq!(value["phoneNumberId"], "pn-123");
        assert_eq!(value["customer"]["number"], "555-1234");
        assert_eq!(value["metadata"]["call_id"], "42");
        assert_eq!(value["assistant"]["serverUrl"], "https://example.com/webhooks/vapi");
        assert_eq!(value["assistant"]["endCallMessage"], "Thank you, goodbye!");
        assert_eq!(value["assistant"]["voice"]["provider"], "lmnt");
        assert_eq!(value["assistant"]["model"]["model"], "gpt-4o");

        let prompt = value["assistant"]["model"]["messages"][0]["content"]
            .as_str()
            .unwrap();
        assert!(prompt.contains("Stanford Golf Course"));
        assert!(prompt.contains("2024-06-01 at 14:00 for 4 players"));
        assert!(prompt.contains("under the name Alex"));

        let schema = &value["assistant"]["analysisPlan"]["structuredDataSchema"];
        assert_eq!(schema["properties"]["booking_confirmed"]["type"], "boolean");
    }

    #[test]
    fn test_first_message_singular_player() {
        let config = VapiConfig {
            api_key: String::new(),
            phone_number_id: String::new(),
            base_url: String::new(),
            server_base_url: String::new(),
            course_name: "Stanford Golf Course".to_string(),
        };
        let mut one_player = spec();
        one_player.num_players = 1;
        let request = CreateCallRequest::from_spec(&config, &one_player);

        assert!(request.assistant.first_message.contains("for 1 player on"));
    }

    #[test]
    fn test_end_of_call_report_confirmed() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({
            "message": {
                "type": "end-of-call-report",
                "call": {"id": "vapi-abc", "metadata": {"call_id": "7"}},
                "transcript": "Hello, booked.",
                "endedReason": "customer-ended-call",
                "analysis": {
                    "summary": "Tee time booked.",
                    "structuredData": {"booking_confirmed": true, "confirmation_number": "G-42"}
                }
            }
        }))
        .unwrap();

        assert_eq!(envelope.correlation_id(), Some(7));
        assert_eq!(envelope.provider_call_id(), Some("vapi-abc"));

        match envelope.signal() {
            ProviderSignal::Ended(outcome) => {
                assert!(outcome.booking_confirmed);
                assert_eq!(outcome.transcript, "Hello, booked.");
                assert_eq!(outcome.summary, "Tee time booked.");
                assert_eq!(outcome.ended_reason, "customer-ended-call");
            }
            other => panic!("expected ended signal, got {:?}", other),
        }
    }

    #[test]
    fn test_end_of_call_report_without_analysis() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({
            "message": {
                "type": "end-of-call-report",
                "call": {"id": "vapi-abc"}
            }
        }))
        .unwrap();

        match envelope.signal() {
            ProviderSignal::Ended(outcome) => {
                assert!(!outcome.booking_confirmed);
                assert_eq!(outcome.transcript, "");
                assert_eq!(outcome.summary, "");
                assert_eq!(outcome.ended_reason, "");
            }
            other => panic!("expected ended signal, got {:?}", other),
        }
    }

    #[test]
    fn test_status_update_ongoing_statuses() {
        for status in ["queued", "ringing", "in-progress", "forwarding"] {
            let envelope: WebhookEnvelope = serde_json::from_value(json!({
                "message": {"type": "status-update", "status": status}
            }))
            .unwrap();
            assert_eq!(envelope.signal(), ProviderSignal::Ongoing, "status {status}");
        }
    }

    #[test]
    fn test_status_update_unknown_status() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({
            "message": {"type": "status-update", "status": "ended"}
        }))
        .unwrap();
        assert_eq!(envelope.signal(), ProviderSignal::Unrecognized);
    }

    #[test]
    fn test_unknown_event_type_unrecognized() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({
            "message": {"type": "speech-update", "call": {"id": "vapi-abc"}}
        }))
        .unwrap();
        assert_eq!(envelope.signal(), ProviderSignal::Unrecognized);
    }

    #[test]
    fn test_empty_envelope_decodes() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(envelope.correlation_id(), None);
        assert_eq!(envelope.provider_call_id(), None);
        assert_eq!(envelope.signal(), ProviderSignal::Unrecognized);
    }

    #[test]
    fn test_non_numeric_correlation_id_ignored() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({
            "message": {"type": "status-update", "call": {"metadata": {"call_id": "not-a-number"}}}
        }))
        .unwrap();
        assert_eq!(envelope.correlation_id(), None);
    }

    #[test]
    fn test_polled_call_signals() {
        let ended: VapiCall = serde_json::from_value(json!({
            "id": "vapi-abc",
            "status": "ended",
            "transcript": "t",
            "endedReason": "assistant-ended-call",
            "analysis": {"summary": "s", "structuredData": {"booking_confirmed": true}}
        }))
        .unwrap();
        assert!(matches!(ended.signal(), ProviderSignal::Ended(o) if o.booking_confirmed));

        let ringing: VapiCall =
            serde_json::from_value(json!({"id": "vapi-abc", "status": "ringing"})).unwrap();
        assert_eq!(ringing.signal(), ProviderSignal::Ongoing);

        let scheduled: VapiCall =
            serde_json::from_value(json!({"id": "vapi-abc", "status": "scheduled"})).unwrap();
        assert_eq!(scheduled.signal(), ProviderSignal::Unrecognized);

        let no_status: VapiCall = serde_json::from_value(json!({"id": "vapi-abc"})).unwrap();
        assert_eq!(no_status.signal(), ProviderSignal::Unrecognized);
    }
}
