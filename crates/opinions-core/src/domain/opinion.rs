use std::fmt;

/// Server-assigned identifier of a persisted opinion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpinionId(String);

impl OpinionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpinionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OpinionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OpinionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opinion entity - a persisted entry of the feed.
///
/// Only the remote service creates these. `votes` is owned by the server;
/// the client never edits the other fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opinion {
    pub id: OpinionId,
    pub title: String,
    pub body: String,
    pub user_name: String,
    pub votes: i64,
}

/// A validated draft, ready to be sent to the remote service.
///
/// Built by [`FormDraft::validate`](super::FormDraft::validate); fields are
/// already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOpinion {
    pub title: String,
    pub body: String,
    pub user_name: String,
}
