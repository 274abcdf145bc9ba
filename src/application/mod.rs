//! Application layer - use cases coordinating the domain and its ports

pub mod agent_service;

pub use agent_service::{AgentService, AiAgentCallRequest, WebhookDisposition};
