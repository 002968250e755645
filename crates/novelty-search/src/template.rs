use std::fmt;

use serde::{Deserialize, Serialize};

use novelty_types::{Digest, ValidationError};

/// Label of the trailing salt line.
pub const SALT_LABEL: &str = "Novelty salt: ";

/// Author and committer identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A commit instant: seconds since the UNIX epoch plus the local UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub offset_minutes: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, offset_minutes: i32) -> Self {
        Self {
            seconds,
            offset_minutes,
        }
    }
}

impl fmt::Display for Timestamp {
    /// git's `<seconds> <±HHMM>` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let abs = self.offset_minutes.unsigned_abs();
        write!(f, "{} {}{:02}{:02}", self.seconds, sign, abs / 60, abs % 60)
    }
}

/// Repository state captured once, before the search starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Tree of the staged index.
    pub tree: Digest,
    /// Current `HEAD` commit; `None` on an unborn branch.
    pub parent: Option<Digest>,
    pub identity: Identity,
    pub when: Timestamp,
}

/// The fixed part of every candidate commit record.
///
/// Author and committer share the snapshot's identity and instant. Everything
/// up to and including the salt label is rendered once; each candidate then
/// only appends its salt and the closing newline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitTemplate {
    snapshot: RepositorySnapshot,
    message: String,
    head: Vec<u8>,
}

impl CommitTemplate {
    /// Freeze `snapshot` and `message` into a template.
    pub fn new(
        snapshot: RepositorySnapshot,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let mut head = format!("tree {}\n", snapshot.tree);
        if let Some(parent) = &snapshot.parent {
            head.push_str(&format!("parent {parent}\n"));
        }
        let Identity { name, email } = &snapshot.identity;
        head.push_str(&format!("author {name} <{email}> {}\n", snapshot.when));
        head.push_str(&format!("committer {name} <{email}> {}\n", snapshot.when));
        head.push_str(&format!("\n{message}\n\n{SALT_LABEL}"));

        Ok(Self {
            snapshot,
            message,
            head: head.into_bytes(),
        })
    }

    pub fn snapshot(&self) -> &RepositorySnapshot {
        &self.snapshot
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render the candidate record for `salt`.
    pub fn render(&self, salt: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.head.len() + salt.len() + 1);
        self.render_into(salt, &mut out);
        out
    }

    /// Render the candidate record for `salt` into `out`, replacing its
    /// contents.
    pub fn render_into(&self, salt: &str, out: &mut Vec<u8>) {
        out.clear();
        out.extend_from_slice(&self.head);
        out.extend_from_slice(salt.as_bytes());
        out.push(b'\n');
    }
}
