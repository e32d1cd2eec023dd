//! Shared decision session - lifecycle and participants.
//!
//! A [`Session`] is one multi-participant decision instance identified by a
//! short shareable code. Its status only ever moves forward
//! (`Waiting → Swiping → Voting → Done`); concurrent attempts to write the
//! same target status are harmless, which is what makes host-observer
//! transitions safe without a distributed lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateId, CandidateSet};
use crate::error::DomainError;

/// Short human-shareable session identifier (e.g., "K3QZ7P").
///
/// Generated randomly at session creation; collisions are an accepted
/// low-probability risk surfaced by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionCode(String);

impl SessionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SessionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable per-session participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a shared decision session.
///
/// Transitions are monotonic and may not skip states: `Waiting → Done` and
/// `Swiping → Done` are never produced, even when the mutual-likes output is
/// a singleton (the group flow still passes through `Voting`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Waiting,
    Swiping,
    Voting,
    Done,
}

impl SessionStatus {
    /// Whether a write moving this status to `next` is acceptable.
    ///
    /// Re-writing the current value is allowed (idempotent concurrent
    /// transitions); moving backward or skipping a state is not.
    pub fn can_advance_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Waiting, Waiting)
                | (Waiting, Swiping)
                | (Swiping, Swiping)
                | (Swiping, Voting)
                | (Voting, Voting)
                | (Voting, Done)
                | (Done, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Done)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::Swiping => "swiping",
            SessionStatus::Voting => "voting",
            SessionStatus::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// One shared multi-participant decision instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionCode,
    pub host_id: ParticipantId,
    pub status: SessionStatus,
    pub candidates: CandidateSet,
    pub deck_size: usize,
    pub created_at: DateTime<Utc>,
    pub winner_id: Option<CandidateId>,
    pub winner_name: Option<String>,
}

impl Session {
    pub fn new(
        id: SessionCode,
        host_id: ParticipantId,
        candidates: CandidateSet,
        created_at: DateTime<Utc>,
    ) -> Self {
        let deck_size = candidates.len();
        Self {
            id,
            host_id,
            status: SessionStatus::Waiting,
            candidates,
            deck_size,
            created_at,
            winner_id: None,
            winner_name: None,
        }
    }

    /// Validate and apply a status transition.
    pub fn advance(&mut self, next: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_advance_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Whether `participant_id` holds the host capability.
    ///
    /// All clients run the same code; host-only operations are gated on this
    /// predicate rather than on a role subtype.
    pub fn is_host(&self, participant_id: &ParticipantId) -> bool {
        &self.host_id == participant_id
    }
}

/// One participant of a session and their replicated swipe state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
    /// candidate id → liked; one entry per swiped candidate
    pub swipes: HashMap<CandidateId, bool>,
    pub done_swiping: bool,
    pub done_swiping_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(id: ParticipantId, display_name: impl Into<String>, joined_at: DateTime<Utc>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            joined_at,
            swipes: HashMap::new(),
            done_swiping: false,
            done_swiping_at: None,
        }
    }

    /// Ids of candidates this participant liked.
    pub fn liked_ids(&self) -> impl Iterator<Item = &CandidateId> {
        self.swipes
            .iter()
            .filter(|(_, liked)| **liked)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::test_support::candidate;

    fn session() -> Session {
        Session::new(
            SessionCode::new("ABC123"),
            ParticipantId::new("host"),
            CandidateSet::new(vec![candidate("a", "A", 4.0)]),
            Utc::now(),
        )
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut s = session();
        assert_eq!(s.status, SessionStatus::Waiting);
        s.advance(SessionStatus::Swiping).unwrap();
        s.advance(SessionStatus::Voting).unwrap();
        s.advance(SessionStatus::Done).unwrap();
        assert!(s.status.is_terminal());
    }

    #[test]
    fn test_rewriting_current_status_is_idempotent() {
        let mut s = session();
        s.advance(SessionStatus::Swiping).unwrap();
        // A concurrent observer writing the same target is harmless
        s.advance(SessionStatus::Swiping).unwrap();
        assert_eq!(s.status, SessionStatus::Swiping);
    }

    #[test]
    fn test_skipping_states_is_invalid() {
        let mut s = session();
        assert!(s.advance(SessionStatus::Done).is_err());
        assert!(s.advance(SessionStatus::Voting).is_err());

        s.advance(SessionStatus::Swiping).unwrap();
        assert!(s.advance(SessionStatus::Done).is_err());
    }

    #[test]
    fn test_no_backward_transitions() {
        let mut s = session();
        s.advance(SessionStatus::Swiping).unwrap();
        s.advance(SessionStatus::Voting).unwrap();
        assert!(s.advance(SessionStatus::Swiping).is_err());
        assert!(s.advance(SessionStatus::Waiting).is_err());
    }

    #[test]
    fn test_host_predicate() {
        let s = session();
        assert!(s.is_host(&ParticipantId::new("host")));
        assert!(!s.is_host(&ParticipantId::new("guest")));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStatus::Waiting).unwrap();
        assert_eq!(json, r#""waiting""#);
    }

    #[test]
    fn test_participant_liked_ids() {
        let mut p = Participant::new(ParticipantId::new("p1"), "Ana", Utc::now());
        p.swipes.insert(CandidateId::new("a"), true);
        p.swipes.insert(CandidateId::new("b"), false);
        let liked: Vec<_> = p.liked_ids().collect();
        assert_eq!(liked, vec![&CandidateId::new("a")]);
    }
}
