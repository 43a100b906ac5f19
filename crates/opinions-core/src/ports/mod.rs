//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod opinions_api;

pub use opinions_api::OpinionsApi;
