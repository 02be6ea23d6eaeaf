//! HTTP client module
//!
//! Transport used by [`crate::operation::HttpListOperation`].
//!
//! # Features
//!
//! - **Timeouts**: per-client and per-request
//! - **Opt-in Retries**: bounded transport retries with backoff, off by default
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
