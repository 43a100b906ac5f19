//! # Opinions Core
//!
//! The domain layer of the opinions client.
//! This crate holds the opinion types, draft validation, the port to the
//! remote service, and the client-side services that cache and mutate the
//! feed. It has no HTTP code of its own.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApiError, FieldError};
pub use services::{
    ClientPolicy, FormPhase, FormView, OpinionFormController, OpinionSnapshot, OpinionStore,
    SubmitOutcome, VoteController, VoteDirection, VoteOutcome, VoteRequest,
};
