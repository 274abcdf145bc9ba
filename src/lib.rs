//! teetime - a call scheduling service for golf tee-time bookings
//!
//! Manual call tasks are plain CRUD records; AI-agent tasks are placed
//! through the Vapi voice platform and reconciled from its webhook
//! events or on-demand polling.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::error::{DomainError, Result};
