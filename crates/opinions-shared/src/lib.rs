//! # Opinions Shared
//!
//! JSON shapes exchanged with the opinions service.
//! Used by the HTTP adapter and by the fake service in its tests.

pub mod dto;

pub use dto::{CreateOpinionRequest, OpinionDto, WireId};
