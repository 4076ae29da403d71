//! Authenticated HTTP client used for every Nexus call.

mod client;

pub use client::HttpClient;
