//! Join group flow use case
//!
//! The participant-side client of a shared session: join, swipe the shared
//! deck, vote in each poll round, and follow the session to its terminal
//! state. The host's own participant runs this flow too; only the observer
//! in `host_group_flow` is host-exclusive.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use tablepick_domain::{
    Candidate, Participant, ParticipantId, Session, SessionCode, SessionStatus, SwipeDeck,
};

use crate::ports::decision_store::{DecisionStore, StoreError};
use crate::ports::judge::{SwipeFeed, VoteChooser};
use crate::ports::progress::{FlowProgress, NoProgress};
use crate::use_cases::host_group_flow::GroupFlowError;

/// Snapshot handed back after joining a session.
#[derive(Debug, Clone)]
pub struct JoinedSession {
    pub session: Session,
    pub participant_id: ParticipantId,
}

impl JoinedSession {
    pub fn is_host(&self) -> bool {
        self.session.is_host(&self.participant_id)
    }
}

/// Use case for participating in a shared decision session.
pub struct JoinGroupFlowUseCase<S: DecisionStore + 'static> {
    store: Arc<S>,
}

impl<S: DecisionStore + 'static> JoinGroupFlowUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Join an existing session by its shareable code.
    pub async fn join(
        &self,
        code: &SessionCode,
        participant_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<JoinedSession, GroupFlowError> {
        let session_rx = self.store.watch_session(code).await?;
        let session = session_rx
            .borrow()
            .clone()
            .ok_or_else(|| GroupFlowError::SessionNotFound(code.clone()))?;
        if session.status.is_terminal() {
            return Err(GroupFlowError::SessionFinished(code.clone()));
        }

        let participant_id = ParticipantId::new(participant_id);
        let participant = Participant::new(participant_id.clone(), display_name, Utc::now());
        self.store.join_participant(code, participant).await?;

        info!(session = %code, participant = %participant_id, "Joined session");
        Ok(JoinedSession {
            session,
            participant_id,
        })
    }

    /// Follow the session to completion with default (no-op) progress.
    pub async fn run(
        &self,
        joined: &JoinedSession,
        feed: &dyn SwipeFeed,
        chooser: &dyn VoteChooser,
    ) -> Result<Candidate, GroupFlowError> {
        self.run_with_progress(joined, feed, chooser, &NoProgress)
            .await
    }

    /// Swipe, vote and wait until the session reaches `Done`.
    ///
    /// Returns the winning candidate.
    pub async fn run_with_progress(
        &self,
        joined: &JoinedSession,
        feed: &dyn SwipeFeed,
        chooser: &dyn VoteChooser,
        progress: &dyn FlowProgress,
    ) -> Result<Candidate, GroupFlowError> {
        let code = &joined.session.id;
        let participant_id = &joined.participant_id;
        let mut session_rx = self.store.watch_session(code).await?;

        // Wait for the host to start the deck
        loop {
            let session = session_rx
                .borrow_and_update()
                .clone()
                .ok_or_else(|| GroupFlowError::SessionNotFound(code.clone()))?;
            if session.status >= SessionStatus::Swiping {
                progress.on_status(session.status);
                break;
            }
            session_rx
                .changed()
                .await
                .map_err(|_| StoreError::SubscriptionClosed)?;
        }

        // Swipe the shared-order deck: no randomization in the group flow so
        // every participant traverses the same sequence.
        let candidates = joined.session.candidates.clone();
        let mut deck = SwipeDeck::new(candidates.as_slice().to_vec());
        while let Some(candidate) = deck.current() {
            let liked = feed.decide(candidate).await?;
            let result = deck.swipe(liked)?;
            self.store
                .record_swipe(code, participant_id, result.candidate_id, result.liked)
                .await?;
        }
        self.store.mark_done_swiping(code, participant_id).await?;
        debug!(session = %code, participant = %participant_id, "Done swiping");

        // Follow poll rounds until the session is done. Each wakeup re-reads
        // full snapshots; votes are cast at most once per open round.
        let mut round_number = 0u32;
        loop {
            let session = session_rx
                .borrow_and_update()
                .clone()
                .ok_or_else(|| GroupFlowError::SessionNotFound(code.clone()))?;
            if session.status.is_terminal() {
                let winner_id = session.winner_id.ok_or(GroupFlowError::MissingWinner)?;
                let winner = candidates
                    .get(&winner_id)
                    .cloned()
                    .ok_or(GroupFlowError::UnknownCandidate(winner_id))?;
                progress.on_status(SessionStatus::Done);
                progress.on_winner(&winner);
                return Ok(winner);
            }

            let mut round_rx = self.store.watch_poll_round(code, round_number).await?;
            let round = round_rx.borrow_and_update().clone();

            match round {
                Some(round) if round.is_open() => {
                    if !round.votes.contains_key(participant_id) {
                        let options: Vec<Candidate> = round
                            .candidate_ids
                            .iter()
                            .filter_map(|id| candidates.get(id).cloned())
                            .collect();
                        let vote = chooser.choose(&options).await?;
                        self.store
                            .cast_vote(code, round_number, participant_id, vote)
                            .await?;
                        debug!(session = %code, participant = %participant_id, round = round_number, "Voted");
                    }
                    wait_either(&mut session_rx, &mut round_rx).await?;
                }
                Some(round) => {
                    // Closed: a tie opens the next round, a winner ends the
                    // session (observed via the session document)
                    if round.winner_id.is_none() {
                        round_number += 1;
                    } else {
                        wait_changed(&mut session_rx).await?;
                    }
                }
                None => {
                    wait_either(&mut session_rx, &mut round_rx).await?;
                }
            }
        }
    }
}

async fn wait_changed<T>(rx: &mut tokio::sync::watch::Receiver<T>) -> Result<(), StoreError> {
    rx.changed().await.map_err(|_| StoreError::SubscriptionClosed)
}

async fn wait_either<A, B>(
    a: &mut tokio::sync::watch::Receiver<A>,
    b: &mut tokio::sync::watch::Receiver<B>,
) -> Result<(), StoreError> {
    tokio::select! {
        changed = a.changed() => changed.map_err(|_| StoreError::SubscriptionClosed),
        changed = b.changed() => changed.map_err(|_| StoreError::SubscriptionClosed),
    }
}
