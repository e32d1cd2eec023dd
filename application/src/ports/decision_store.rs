//! Replicated decision store port
//!
//! Defines the interface to the shared, eventually-consistent, push-notifying
//! document store that coordinates a group session. There is no central
//! scheduler: every client subscribes to the documents it cares about and
//! reacts to change notifications.
//!
//! # Delivery model
//!
//! - Writes are fire-and-forget from the caller's perspective: they become
//!   eventually visible to all subscribers. Per document, writes apply in
//!   submission order; there is **no** cross-document atomicity.
//! - `record_swipe` and `cast_vote` are single-key merges into their maps
//!   (last write per key wins); they never replace the whole map.
//! - Subscriptions are [`tokio::sync::watch`] receivers delivering full
//!   immutable snapshots. Consumers must treat every snapshot as completely
//!   replacing their local copy and recompute derived state from it.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use tablepick_domain::{
    Candidate, CandidateId, Participant, ParticipantId, PollRound, Session, SessionCode,
    SessionStatus,
};

/// Errors surfaced by the decision store.
///
/// Transport failures are retryable conditions for the caller; the
/// invariant-violation variants (`InvalidTransition`, `RoundAlreadyClosed`,
/// `PreviousRoundOpen`) indicate programming defects, since the gating rules
/// in the use cases make them unreachable through normal operation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session {0} already exists")]
    SessionExists(SessionCode),

    #[error("Session {0} not found")]
    SessionNotFound(SessionCode),

    #[error("Participant {0} not found in session")]
    ParticipantNotFound(ParticipantId),

    #[error("Poll round {0} not found")]
    RoundNotFound(u32),

    #[error("Rejected status transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Poll round {0} is already closed")]
    RoundAlreadyClosed(u32),

    #[error("Candidate {candidate_id} is not on round {round_number}'s ballot")]
    VoteNotInRound {
        round_number: u32,
        candidate_id: CandidateId,
    },

    #[error("Cannot open round {0}: the previous round is still open")]
    PreviousRoundOpen(u32),

    #[error("Poll round {0} already exists")]
    RoundExists(u32),

    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Subscription closed")]
    SubscriptionClosed,
}

/// The replicated document store coordinating group sessions.
///
/// Implementations (adapters) live in the infrastructure layer; the
/// in-process adapter backs tests and the CLI demo.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    // ==================== Session document ====================

    /// Persist a freshly created session. Fails if the code is taken
    /// (session-code collisions are surfaced, not resolved).
    async fn create_session(&self, session: Session) -> Result<(), StoreError>;

    /// Write the session status. The store rejects backward or skipping
    /// transitions; re-writing the current value is accepted and harmless,
    /// which makes concurrent observer-driven transitions idempotent.
    async fn update_session_status(
        &self,
        code: &SessionCode,
        status: SessionStatus,
    ) -> Result<(), StoreError>;

    /// Record the winner and move the session to `Done` in one write.
    async fn set_winner(&self, code: &SessionCode, winner: &Candidate) -> Result<(), StoreError>;

    // ==================== Participant documents ====================

    async fn join_participant(
        &self,
        code: &SessionCode,
        participant: Participant,
    ) -> Result<(), StoreError>;

    /// Merge one swipe into the participant's swipe map.
    async fn record_swipe(
        &self,
        code: &SessionCode,
        participant_id: &ParticipantId,
        candidate_id: CandidateId,
        liked: bool,
    ) -> Result<(), StoreError>;

    async fn mark_done_swiping(
        &self,
        code: &SessionCode,
        participant_id: &ParticipantId,
    ) -> Result<(), StoreError>;

    // ==================== Poll round documents ====================

    /// Open a new round. Host-only by convention; the previous round must be
    /// closed (no two open rounds may coexist).
    async fn create_poll_round(
        &self,
        code: &SessionCode,
        round_number: u32,
        candidate_ids: Vec<CandidateId>,
    ) -> Result<(), StoreError>;

    /// Merge one vote into the round's vote map (a re-vote overrides).
    /// The candidate must be on the round's ballot.
    async fn cast_vote(
        &self,
        code: &SessionCode,
        round_number: u32,
        participant_id: &ParticipantId,
        candidate_id: CandidateId,
    ) -> Result<(), StoreError>;

    /// Close a round exactly once, with the unique winner or `None` on a tie.
    async fn close_poll_round(
        &self,
        code: &SessionCode,
        round_number: u32,
        winner_id: Option<CandidateId>,
    ) -> Result<(), StoreError>;

    // ==================== Subscriptions ====================

    /// Push stream of the session document. `None` until/unless it exists.
    async fn watch_session(
        &self,
        code: &SessionCode,
    ) -> Result<watch::Receiver<Option<Session>>, StoreError>;

    /// Push stream of all participants of a session.
    async fn watch_participants(
        &self,
        code: &SessionCode,
    ) -> Result<watch::Receiver<Vec<Participant>>, StoreError>;

    /// Push stream of one poll round. `None` until the round is created.
    async fn watch_poll_round(
        &self,
        code: &SessionCode,
        round_number: u32,
    ) -> Result<watch::Receiver<Option<PollRound>>, StoreError>;
}
