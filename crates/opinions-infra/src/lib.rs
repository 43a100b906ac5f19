//! # Opinions Infrastructure
//!
//! Concrete implementations of the `OpinionsApi` port defined in
//! `opinions-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No HTTP client, in-memory service only
//! - `http` - Remote service over HTTP/JSON via reqwest

pub mod memory;

#[cfg(feature = "http")]
pub mod http;

pub use memory::{InMemoryOpinionsApi, RequestStats};

#[cfg(feature = "http")]
pub use http::{HttpApiConfig, HttpOpinionsApi};
