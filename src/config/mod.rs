//! Configuration management
//!
//! Loaded once at startup and passed explicitly to the components that
//! need it; there is no ambient configuration state.

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub vapi: VapiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Credentials and endpoints for the Vapi voice platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VapiConfig {
    /// Bearer credential for the Vapi API
    pub api_key: String,
    /// Provider-assigned ID of the phone number calls are placed from
    pub phone_number_id: String,
    pub base_url: String,
    /// Public base URL of this server, used to build the webhook callback
    pub server_base_url: String,
    /// Name of the golf course the agent calls
    pub course_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "postgres://postgres@localhost/teetime".to_string(),
            },
            vapi: VapiConfig {
                api_key: String::new(),
                phone_number_id: String::new(),
                base_url: "https://api.vapi.ai".to_string(),
                server_base_url: "http://localhost:8000".to_string(),
                course_name: "Stanford Golf Course".to_string(),
            },
        }
    }
}

impl Config {
    /// Build the configuration from environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            vapi: VapiConfig {
                api_key: env::var("VAPI_API_KEY").unwrap_or_default(),
                phone_number_id: env::var("VAPI_PHONE_NUMBER_ID").unwrap_or_default(),
                base_url: env::var("VAPI_BASE_URL").unwrap_or(defaults.vapi.base_url),
                server_base_url: env::var("SERVER_BASE_URL")
                    .unwrap_or(defaults.vapi.server_base_url),
                course_name: env::var("GOLF_COURSE_NAME").unwrap_or(defaults.vapi.course_name),
            },
        }
    }
}
