//! Record lifecycle
//!
//! `Transient -> Pending -> Persistent -> Detached`, and
//! `Persistent -> Deleted`. A record learns that its session ended through
//! a weak link onto a token the session owns.

use std::fmt;
use std::sync::{Arc, Weak};

/// Observable lifecycle state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Constructed, never handed to a session, no id
    Transient,
    /// Staged in a session, not yet committed
    Pending,
    /// Committed and owned by a live session
    Persistent,
    /// Committed, but the owning session has ended
    Detached,
    /// Deleted and committed
    Deleted,
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordState::Transient => "transient",
            RecordState::Pending => "pending",
            RecordState::Persistent => "persistent",
            RecordState::Detached => "detached",
            RecordState::Deleted => "deleted",
        };
        f.write_str(name)
    }
}

/// Liveness token owned by a session; dropping it detaches its records
#[derive(Debug, Default)]
pub struct SessionToken(Arc<()>);

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link records keep to observe this session
    pub fn link(&self) -> SessionLink {
        SessionLink(Some(Arc::downgrade(&self.0)))
    }

    /// Whether `link` points at this session
    pub fn owns(&self, link: &SessionLink) -> bool {
        link.0
            .as_ref()
            .is_some_and(|weak| Weak::ptr_eq(weak, &Arc::downgrade(&self.0)))
    }
}

/// A record's view onto the session it came from
#[derive(Debug, Clone, Default)]
pub struct SessionLink(Option<Weak<()>>);

impl SessionLink {
    /// A link to no session at all (transient records)
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_live(&self) -> bool {
        self.0.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_dies_with_token() {
        let token = SessionToken::new();
        let link = token.link();
        assert!(link.is_live());
        assert!(token.owns(&link));

        drop(token);
        assert!(!link.is_live());
    }

    #[test]
    fn test_links_are_session_specific() {
        let a = SessionToken::new();
        let b = SessionToken::new();
        assert!(!a.owns(&b.link()));
        assert!(!a.owns(&SessionLink::none()));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(RecordState::Detached.to_string(), "detached");
    }
}
