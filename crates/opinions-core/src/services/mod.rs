//! Client-side services: the opinion cache and the controllers that drive it.

mod form;
mod store;
mod vote;

#[cfg(test)]
pub(crate) mod testing;

pub use form::{FormPhase, FormView, OpinionFormController, SubmitOutcome};
pub use store::{OpinionSnapshot, OpinionStore};
pub use vote::{VoteController, VoteDirection, VoteOutcome, VoteRequest};

/// Knobs for the two places where a failed remote call could be compensated.
///
/// The defaults keep the stale-but-visible behavior: a failed vote leaves the
/// optimistic count in place until the next load, and a failed create still
/// clears the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientPolicy {
    /// Revert the optimistic counter by the inverse delta when a vote fails.
    pub rollback_failed_votes: bool,
    /// Clear the form even when the store did not persist the opinion.
    pub reset_form_on_failed_create: bool,
}

impl Default for ClientPolicy {
    fn default() -> Self {
        Self {
            rollback_failed_votes: false,
            reset_form_on_failed_create: true,
        }
    }
}
