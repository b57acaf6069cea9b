// Three-step confirmation workflow for treatment-protocol queries.
//
// Clinical protocols vary materially by condition and publisher; a search
// issued before both are confirmed can return guidance for the wrong
// condition. The guard makes the ordering explicit: a tag must be confirmed
// against the supported list, then a publisher against that tag's
// publishers, and only then is free-text search reachable.

use crate::types::{Publisher, SessionId, Tag};
use std::collections::HashMap;
use std::sync::Mutex;

/// Confirmation progress for one session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    NoTag,
    TagConfirmed {
        tag: Tag,
    },
    PublisherConfirmed {
        tag: Tag,
        publisher: Publisher,
    },
}

/// A protocol tool was called before its prerequisite confirmation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("no tag confirmed for this session; confirm a supported tag first")]
    TagNotConfirmed,
    #[error("no publisher confirmed for tag '{tag}'; confirm a publisher first")]
    PublisherNotConfirmed { tag: String },
}

/// Result of a tag confirmation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Confirmed(Tag),
    /// Candidate is not a supported tag; the session stays where it was
    Unknown { supported: Vec<Tag> },
}

/// Result of a publisher confirmation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherOutcome {
    Confirmed(Publisher),
    /// Candidate does not publish for the confirmed tag
    Unknown { available: Vec<Publisher> },
}

/// Per-session workflow state, keyed by conversation.
///
/// Sessions never share confirmations; a missing entry is `NoTag`.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, WorkflowState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Current state for a session (`NoTag` if never seen)
    pub fn state(&self, session: &SessionId) -> WorkflowState {
        self.sessions
            .lock()
            .unwrap()
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    /// Attempt to confirm `candidate` against the supported tag list.
    ///
    /// A match moves the session to `TagConfirmed`, discarding any
    /// previously confirmed publisher. A miss leaves the session unchanged
    /// and returns the full supported list so the caller can self-correct.
    pub fn confirm_tag(
        &self,
        session: &SessionId,
        candidate: &str,
        supported: &[Tag],
    ) -> TagOutcome {
        match supported.iter().find(|tag| tag.matches(candidate)) {
            Some(tag) => {
                self.sessions
                    .lock()
                    .unwrap()
                    .insert(*session, WorkflowState::TagConfirmed { tag: tag.clone() });
                tracing::info!(session = %session, tag = %tag.name, "tag confirmed");
                TagOutcome::Confirmed(tag.clone())
            }
            None => {
                tracing::info!(session = %session, candidate, "tag not in supported list");
                TagOutcome::Unknown {
                    supported: supported.to_vec(),
                }
            }
        }
    }

    /// The tag confirmed for this session, if any
    pub fn confirmed_tag(&self, session: &SessionId) -> Option<Tag> {
        match self.state(session) {
            WorkflowState::NoTag => None,
            WorkflowState::TagConfirmed { tag }
            | WorkflowState::PublisherConfirmed { tag, .. } => Some(tag),
        }
    }

    /// Attempt to confirm `candidate` against the publishers available for
    /// the session's confirmed tag.
    ///
    /// Requires a confirmed tag; re-selecting a publisher under the same tag
    /// is allowed. A miss leaves the session unchanged and returns the valid
    /// publisher list.
    pub fn confirm_publisher(
        &self,
        session: &SessionId,
        candidate: &str,
        available: &[Publisher],
    ) -> Result<PublisherOutcome, WorkflowError> {
        let tag = self
            .confirmed_tag(session)
            .ok_or(WorkflowError::TagNotConfirmed)?;

        match available.iter().find(|publisher| publisher.matches(candidate)) {
            Some(publisher) => {
                self.sessions.lock().unwrap().insert(
                    *session,
                    WorkflowState::PublisherConfirmed {
                        tag: tag.clone(),
                        publisher: publisher.clone(),
                    },
                );
                tracing::info!(
                    session = %session,
                    tag = %tag.name,
                    publisher = %publisher.name,
                    "publisher confirmed"
                );
                Ok(PublisherOutcome::Confirmed(publisher.clone()))
            }
            None => {
                tracing::info!(session = %session, candidate, "publisher not listed for tag");
                Ok(PublisherOutcome::Unknown {
                    available: available.to_vec(),
                })
            }
        }
    }

    /// Tag and publisher for a search; only available once both are
    /// confirmed. Reusable for repeated searches without re-confirmation.
    pub fn query_context(&self, session: &SessionId) -> Result<(Tag, Publisher), WorkflowError> {
        match self.state(session) {
            WorkflowState::NoTag => Err(WorkflowError::TagNotConfirmed),
            WorkflowState::TagConfirmed { tag } => {
                Err(WorkflowError::PublisherNotConfirmed { tag: tag.name })
            }
            WorkflowState::PublisherConfirmed { tag, publisher } => Ok((tag, publisher)),
        }
    }

    /// Drop a session back to `NoTag`
    pub fn reset(&self, session: &SessionId) {
        self.sessions.lock().unwrap().remove(session);
        tracing::info!(session = %session, "session reset");
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported_tags() -> Vec<Tag> {
        vec![
            Tag::new("diabetes", "Type 2 diabetes mellitus"),
            Tag::new("hypertension", "Essential hypertension"),
        ]
    }

    fn diabetes_publishers() -> Vec<Publisher> {
        vec![
            Publisher {
                id: "pub-icmr".to_string(),
                name: "ICMR".to_string(),
                tag: "diabetes".to_string(),
            },
            Publisher {
                id: "pub-rssdi".to_string(),
                name: "RSSDI".to_string(),
                tag: "diabetes".to_string(),
            },
        ]
    }

    #[test]
    fn unknown_tag_stays_in_no_tag_and_returns_supported_list() {
        let store = SessionStore::new();
        let session = SessionId::new();

        let outcome = store.confirm_tag(&session, "oncology", &supported_tags());
        match outcome {
            TagOutcome::Unknown { supported } => assert_eq!(supported.len(), 2),
            TagOutcome::Confirmed(_) => panic!("unsupported tag must not confirm"),
        }
        assert_eq!(store.state(&session), WorkflowState::NoTag);
    }

    #[test]
    fn known_tag_confirms_case_insensitively() {
        let store = SessionStore::new();
        let session = SessionId::new();

        let outcome = store.confirm_tag(&session, "  Diabetes ", &supported_tags());
        match outcome {
            TagOutcome::Confirmed(tag) => assert_eq!(tag.name, "diabetes"),
            TagOutcome::Unknown { .. } => panic!("supported tag must confirm"),
        }
        assert_eq!(
            store.confirmed_tag(&session).map(|t| t.name),
            Some("diabetes".to_string())
        );
    }

    #[test]
    fn publisher_requires_confirmed_tag() {
        let store = SessionStore::new();
        let session = SessionId::new();

        let result = store.confirm_publisher(&session, "RSSDI", &diabetes_publishers());
        assert_eq!(result, Err(WorkflowError::TagNotConfirmed));
    }

    #[test]
    fn unlisted_publisher_stays_in_tag_confirmed() {
        let store = SessionStore::new();
        let session = SessionId::new();
        store.confirm_tag(&session, "diabetes", &supported_tags());

        let outcome = store
            .confirm_publisher(&session, "WHO", &diabetes_publishers())
            .unwrap();
        match outcome {
            PublisherOutcome::Unknown { available } => assert_eq!(available.len(), 2),
            PublisherOutcome::Confirmed(_) => panic!("unlisted publisher must not confirm"),
        }
        assert!(matches!(
            store.state(&session),
            WorkflowState::TagConfirmed { .. }
        ));
    }

    #[test]
    fn full_confirmation_unlocks_search_context() {
        let store = SessionStore::new();
        let session = SessionId::new();

        store.confirm_tag(&session, "diabetes", &supported_tags());
        store
            .confirm_publisher(&session, "rssdi", &diabetes_publishers())
            .unwrap();

        let (tag, publisher) = store.query_context(&session).unwrap();
        assert_eq!(tag.name, "diabetes");
        assert_eq!(publisher.name, "RSSDI");

        // Repeated searches under the same confirmation need no re-confirmation
        assert!(store.query_context(&session).is_ok());
    }

    #[test]
    fn search_is_gated_in_earlier_states() {
        let store = SessionStore::new();
        let session = SessionId::new();

        assert_eq!(
            store.query_context(&session),
            Err(WorkflowError::TagNotConfirmed)
        );

        store.confirm_tag(&session, "diabetes", &supported_tags());
        assert_eq!(
            store.query_context(&session),
            Err(WorkflowError::PublisherNotConfirmed {
                tag: "diabetes".to_string()
            })
        );
    }

    #[test]
    fn reconfirming_a_tag_discards_the_publisher() {
        let store = SessionStore::new();
        let session = SessionId::new();

        store.confirm_tag(&session, "diabetes", &supported_tags());
        store
            .confirm_publisher(&session, "ICMR", &diabetes_publishers())
            .unwrap();
        store.confirm_tag(&session, "hypertension", &supported_tags());

        assert_eq!(
            store.query_context(&session),
            Err(WorkflowError::PublisherNotConfirmed {
                tag: "hypertension".to_string()
            })
        );
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        let a = SessionId::new();
        let b = SessionId::new();

        store.confirm_tag(&a, "diabetes", &supported_tags());

        assert!(store.confirmed_tag(&b).is_none());
        assert_eq!(
            store.query_context(&b),
            Err(WorkflowError::TagNotConfirmed)
        );
    }

    #[test]
    fn reset_returns_session_to_no_tag() {
        let store = SessionStore::new();
        let session = SessionId::new();

        store.confirm_tag(&session, "diabetes", &supported_tags());
        store.reset(&session);
        assert_eq!(store.state(&session), WorkflowState::NoTag);
    }
}
