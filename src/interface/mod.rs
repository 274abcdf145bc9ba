//! Interface layer - the REST API and webhook endpoint

pub mod api;
