use super::NewOpinion;
use crate::error::FieldError;

pub const USER_NAME_MIN_CHARS: usize = 2;
pub const TITLE_MIN_CHARS: usize = 5;
pub const BODY_MIN_CHARS: usize = 10;
pub const BODY_MAX_CHARS: usize = 300;

/// Raw values the user typed into the new-opinion form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub user_name: String,
    pub title: String,
    pub body: String,
}

impl FormDraft {
    pub fn new(
        user_name: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Check every field and collect all violations, in field order.
    ///
    /// Lengths are counted in characters after trimming. On success the
    /// trimmed values are returned as a [`NewOpinion`].
    pub fn validate(&self) -> Result<NewOpinion, Vec<FieldError>> {
        let user_name = self.user_name.trim();
        let title = self.title.trim();
        let body = self.body.trim();

        let mut errors = Vec::new();

        if user_name.chars().count() < USER_NAME_MIN_CHARS {
            errors.push(FieldError::UserName);
        }

        if title.chars().count() < TITLE_MIN_CHARS {
            errors.push(FieldError::Title);
        }

        let body_len = body.chars().count();
        if !(BODY_MIN_CHARS..=BODY_MAX_CHARS).contains(&body_len) {
            errors.push(FieldError::Body);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewOpinion {
            title: title.to_string(),
            body: body.to_string(),
            user_name: user_name.to_string(),
        })
    }
}
