//! Vapi voice platform integration

pub mod client;
pub mod types;

pub use client::{VapiClient, VapiError};
pub use types::{VapiCall, WebhookEnvelope};
