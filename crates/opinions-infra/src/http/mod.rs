//! Remote opinions service over HTTP/JSON.

mod client;


pub use client::{HttpApiConfig, HttpOpinionsApi};
