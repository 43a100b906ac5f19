//! Plain-text rendering of the feed and the new-opinion form.

use std::fmt::Write;

use opinions_core::domain::Opinion;
use opinions_core::{FormPhase, FormView};

pub const EMPTY_FEED: &str = "No opinions found. Maybe share your opinion on something?";

pub const HELP: &str = "\
Commands:
  list          show all opinions
  new           share your opinion
  up <n>        upvote opinion number n
  down <n>      downvote opinion number n
  reload        fetch the feed again
  help          show this help
  quit          exit";

/// One feed row: the opinion plus what its vote controls should show.
#[derive(Debug, Clone)]
pub struct FeedEntry<'a> {
    pub opinion: &'a Opinion,
    pub displayed_votes: i64,
    pub pending: bool,
}

pub fn render_feed(entries: &[FeedEntry<'_>]) -> String {
    let mut out = String::from("== User Opinions ==\n");

    if entries.is_empty() {
        out.push_str(EMPTY_FEED);
        out.push('\n');
        return out;
    }

    for (index, entry) in entries.iter().enumerate() {
        let opinion = entry.opinion;
        let _ = writeln!(out);
        let _ = writeln!(out, "[{}] {}", index + 1, opinion.title);
        let _ = writeln!(out, "    Shared by {}", opinion.user_name);
        let _ = writeln!(out, "    {}", opinion.body);
        let _ = write!(out, "    votes: {}", entry.displayed_votes);
        if entry.pending {
            out.push_str(" (pending)");
        }
        out.push('\n');
    }

    out
}

/// The form header and, after a rejected attempt, every error message.
pub fn render_form(view: &FormView) -> String {
    let mut out = String::from("== Share your opinion! ==\n");

    if view.phase == FormPhase::Invalid {
        for error in &view.errors {
            let _ = writeln!(out, "  ! {error}");
        }
    }

    out
}

/// Input prompt, showing the echoed value kept from a rejected attempt.
pub fn prompt(label: &str, previous: &str) -> String {
    if previous.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{previous}]: ")
    }
}

#[cfg(test)]
mod tests {
    use opinions_core::FieldError;
    use opinions_core::domain::{FormDraft, OpinionId};

    use super::*;

    fn opinion() -> Opinion {
        Opinion {
            id: OpinionId::from("1"),
            title: "Rust in production".to_string(),
            body: "Fewer pages at 3am.".to_string(),
            user_name: "Ferris".to_string(),
            votes: 5,
        }
    }

    #[test]
    fn test_empty_feed_message() {
        let out = render_feed(&[]);
        assert!(out.contains("No opinions found. Maybe share your opinion on something?"));
    }

    #[test]
    fn test_feed_entry_layout() {
        let opinion = opinion();
        let out = render_feed(&[FeedEntry {
            opinion: &opinion,
            displayed_votes: 6,
            pending: true,
        }]);

        assert!(out.contains("[1] Rust in production"));
        assert!(out.contains("Shared by Ferris"));
        assert!(out.contains("Fewer pages at 3am."));
        assert!(out.contains("votes: 6 (pending)"));
        assert!(!out.contains(EMPTY_FEED));
    }

    #[test]
    fn test_form_lists_errors_only_when_invalid() {
        let mut view = FormView {
            phase: FormPhase::Invalid,
            values: FormDraft::default(),
            errors: vec![FieldError::UserName, FieldError::Body],
        };
        let out = render_form(&view);
        assert!(out.contains("Name is required, and must be at least 2 characters long."));
        assert!(out.contains("Body is required, and must be at least 10 characters long."));

        view.phase = FormPhase::Idle;
        assert!(!render_form(&view).contains("  ! "));
    }

    #[test]
    fn test_prompt_echoes_previous_value() {
        assert_eq!(prompt("Title", ""), "Title: ");
        assert_eq!(prompt("Title", "Hi"), "Title [Hi]: ");
    }
}
