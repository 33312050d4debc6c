//! # IO Module
//!
//! Adapter layer between the domain and the outside world.
//!
//! ## Key Responsibilities
//!
//! - **API Client**: async HTTP access to the budget backend, one year at a time
//! - **Error Translation**: transport, status and decode failures mapped to [`crate::error::FetchError`]
//! - **Reports**: formatting a monthly summary for the terminal
//!
//! ## Current Implementation
//!
//! - **HTTP**: reqwest with rustls and token authentication
//! - **Serialization**: serde for JSON DTOs shared with the backend

pub mod api_client;
pub mod report;

pub use api_client::ApiClient;
pub use report::render_text;
