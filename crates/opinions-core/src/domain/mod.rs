//! Domain entities - the opinion feed's business objects.

mod draft;
mod opinion;

pub use draft::{BODY_MAX_CHARS, BODY_MIN_CHARS, FormDraft, TITLE_MIN_CHARS, USER_NAME_MIN_CHARS};
pub use opinion::{NewOpinion, Opinion, OpinionId};
