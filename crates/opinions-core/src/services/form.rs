//! New-opinion form: validation, submission and error echo.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{FormDraft, Opinion};
use crate::error::FieldError;

use super::{ClientPolicy, OpinionStore};

/// Where the form is in its submit cycle.
///
/// Validation is synchronous, so it has no phase of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Invalid,
    Submitting,
}

/// What the form should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub phase: FormPhase,
    pub values: FormDraft,
    pub errors: Vec<FieldError>,
}

impl FormView {
    fn idle(values: FormDraft) -> Self {
        Self {
            phase: FormPhase::Idle,
            values,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(Vec<FieldError>),
    /// The draft went to the store. `None` when the service did not persist it.
    Submitted(Option<Opinion>),
    /// A submission was already in flight; nothing was sent.
    Busy,
}

/// Returns the form to `Idle` if a submission is dropped before it settles.
struct SubmitGuard<'a> {
    state: &'a Mutex<FormView>,
    settled: bool,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock(self.state);
        if state.phase == FormPhase::Submitting {
            state.phase = FormPhase::Idle;
            tracing::debug!("Submission dropped before it settled");
        }
    }
}

fn lock(state: &Mutex<FormView>) -> MutexGuard<'_, FormView> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct OpinionFormController {
    store: OpinionStore,
    policy: ClientPolicy,
    state: Mutex<FormView>,
}

impl OpinionFormController {
    pub fn new(store: OpinionStore, policy: ClientPolicy) -> Self {
        Self {
            store,
            policy,
            state: Mutex::new(FormView::idle(FormDraft::default())),
        }
    }

    pub async fn view(&self) -> FormView {
        lock(&self.state).clone()
    }

    /// Record edits made after a rejected attempt. Returns the form to
    /// `Idle` and clears the errors; ignored while submitting.
    pub async fn edit(&self, values: FormDraft) {
        let mut state = lock(&self.state);
        if state.phase == FormPhase::Submitting {
            return;
        }
        *state = FormView::idle(values);
    }

    pub async fn submit(&self, draft: FormDraft) -> SubmitOutcome {
        let new_opinion = {
            let mut state = lock(&self.state);
            if state.phase == FormPhase::Submitting {
                tracing::debug!("Submission ignored while another is in flight");
                return SubmitOutcome::Busy;
            }

            match draft.validate() {
                Ok(new_opinion) => {
                    *state = FormView {
                        phase: FormPhase::Submitting,
                        values: draft,
                        errors: Vec::new(),
                    };
                    new_opinion
                }
                Err(errors) => {
                    tracing::debug!(count = errors.len(), "Draft rejected");
                    *state = FormView {
                        phase: FormPhase::Invalid,
                        values: draft,
                        errors: errors.clone(),
                    };
                    return SubmitOutcome::Rejected(errors);
                }
            }
        };

        let mut guard = SubmitGuard {
            state: &self.state,
            settled: false,
        };
        let created = self.store.create(new_opinion).await;
        guard.settled = true;

        let mut state = lock(&self.state);
        let values = if created.is_none() && !self.policy.reset_form_on_failed_create {
            std::mem::take(&mut state.values)
        } else {
            FormDraft::default()
        };
        *state = FormView::idle(values);

        SubmitOutcome::Submitted(created)
    }
}
