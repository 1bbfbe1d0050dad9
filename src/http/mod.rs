//! HTTP client module with response classification.

mod client;
mod status;

pub use client::{HttpClient, USER_AGENT};
pub use status::{describe_status, describe_transport_error};
