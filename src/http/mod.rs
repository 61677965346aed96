//! Shared HTTP client plumbing for the single-shot API calls and the load test.
mod client;


pub use client::{build_client, ensure_success, join_url};
