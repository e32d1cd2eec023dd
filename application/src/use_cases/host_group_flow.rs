//! Host group flow use case
//!
//! The host runs the observer that drives a shared session forward. It never
//! acts on one-shot triggers: every store notification delivers a fresh
//! snapshot and the observer recomputes its predicates from scratch, so
//! stale or duplicated notifications are harmless. The terminal transition
//! writes are idempotent; a second client observing the same conditions and
//! attempting the same write cannot corrupt state.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info, warn};

use tablepick_domain::{
    Candidate, CandidateId, CandidateSet, DomainError, Participant, SessionCode, SessionStatus,
    TallyOutcome, mutual_likes,
};

use crate::aggregator::ParticipantAggregator;
use crate::config::BehaviorConfig;
use crate::ports::decision_store::{DecisionStore, StoreError};
use crate::ports::judge::JudgeError;
use crate::ports::progress::{FlowProgress, NoProgress};

/// Errors that can occur while hosting or following a group session
#[derive(Error, Debug)]
pub enum GroupFlowError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionCode),

    #[error("Cannot create a session without candidates")]
    NoCandidates,

    #[error("Cannot start swiping without participants")]
    NoParticipants,

    #[error("Session {0} has already finished")]
    SessionFinished(SessionCode),

    #[error("Winner {0} is not part of the candidate set")]
    UnknownCandidate(CandidateId),

    #[error("Session finished without a recorded winner")]
    MissingWinner,

    #[error("Preference input failed: {0}")]
    Input(#[from] JudgeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Use case for creating and driving a shared decision session.
///
/// Only the host process runs [`HostGroupFlowUseCase::run`]; every other
/// client follows the same session through the join flow. Host authority is
/// a capability of the process holding this use case, not a separate code
/// path in the store.
pub struct HostGroupFlowUseCase<S: DecisionStore + 'static> {
    store: Arc<S>,
    config: BehaviorConfig,
}

impl<S: DecisionStore + 'static> HostGroupFlowUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            config: BehaviorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BehaviorConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the session document and join the host as its first
    /// participant.
    pub async fn create_session(
        &self,
        code: SessionCode,
        host_id: impl Into<String>,
        display_name: impl Into<String>,
        candidates: CandidateSet,
    ) -> Result<tablepick_domain::Session, GroupFlowError> {
        if candidates.is_empty() {
            return Err(GroupFlowError::NoCandidates);
        }

        let host_id = tablepick_domain::ParticipantId::new(host_id);
        let session =
            tablepick_domain::Session::new(code.clone(), host_id.clone(), candidates, Utc::now());
        self.store.create_session(session.clone()).await?;

        // The host swipes too
        let host = Participant::new(host_id, display_name, Utc::now());
        self.store.join_participant(&code, host).await?;

        info!(session = %code, "Created session");
        Ok(session)
    }

    /// Host-initiated `Waiting → Swiping` transition.
    ///
    /// Requires at least one participant (the host counts).
    pub async fn start_swiping(&self, code: &SessionCode) -> Result<(), GroupFlowError> {
        let participants_rx = self.store.watch_participants(code).await?;
        if participants_rx.borrow().is_empty() {
            return Err(GroupFlowError::NoParticipants);
        }
        self.store
            .update_session_status(code, SessionStatus::Swiping)
            .await?;
        info!(session = %code, "Swiping started");
        Ok(())
    }

    /// Run the host observer to completion with default (no-op) progress.
    pub async fn run(&self, code: &SessionCode) -> Result<Candidate, GroupFlowError> {
        self.run_with_progress(code, &NoProgress).await
    }

    /// Run the host observer until the session reaches `Done`.
    ///
    /// Waits for every participant to finish swiping, resolves the mutual
    /// likes, then drives poll rounds until a unique winner emerges. Returns
    /// the winning candidate.
    pub async fn run_with_progress(
        &self,
        code: &SessionCode,
        progress: &dyn FlowProgress,
    ) -> Result<Candidate, GroupFlowError> {
        let session_rx = self.store.watch_session(code).await?;
        let session = session_rx
            .borrow()
            .clone()
            .ok_or_else(|| GroupFlowError::SessionNotFound(code.clone()))?;
        if session.status.is_terminal() {
            return Err(GroupFlowError::SessionFinished(code.clone()));
        }
        let candidates = session.candidates;

        // Phase 1: wait until every participant is done swiping. Recompute
        // from the full snapshot on each notification; never cache.
        let mut participants_rx = self.store.watch_participants(code).await?;
        let aggregator = loop {
            let aggregator =
                ParticipantAggregator::new(participants_rx.borrow_and_update().clone());
            progress.on_swiping_progress(aggregator.done_count(), aggregator.count());
            if aggregator.all_done() {
                break aggregator;
            }
            participants_rx
                .changed()
                .await
                .map_err(|_| StoreError::SubscriptionClosed)?;
        };

        self.store
            .update_session_status(code, SessionStatus::Voting)
            .await?;
        progress.on_status(SessionStatus::Voting);
        info!(session = %code, participants = aggregator.count(), "All participants done swiping");

        // Phase 2: resolve the group's shared preference
        let options = mutual_likes(&aggregator.swipes_by_participant(), &candidates);
        debug!(session = %code, options = options.len(), "Resolved mutual likes");

        if let [winner] = options.as_slice() {
            // Unanimous singleton: no poll needed
            self.store.set_winner(code, winner).await?;
            progress.on_status(SessionStatus::Done);
            progress.on_winner(winner);
            return Ok(winner.clone());
        }

        // Phase 3: poll rounds with tie-breaks
        let mut option_ids: Vec<CandidateId> = options.iter().map(|c| c.id.clone()).collect();
        let mut round_number = 0u32;

        loop {
            self.store
                .create_poll_round(code, round_number, option_ids.clone())
                .await?;
            let round_options = resolve(&candidates, &option_ids)?;
            progress.on_round_opened(round_number, &round_options);
            info!(session = %code, round = round_number, options = option_ids.len(), "Poll round opened");

            let round = self
                .wait_all_voted(code, round_number, &mut participants_rx, progress)
                .await?;

            match round.tally()? {
                TallyOutcome::Winner(winner_id) => {
                    self.store
                        .close_poll_round(code, round_number, Some(winner_id.clone()))
                        .await?;
                    let winner = candidates
                        .get(&winner_id)
                        .cloned()
                        .ok_or(GroupFlowError::UnknownCandidate(winner_id))?;
                    self.store.set_winner(code, &winner).await?;
                    progress.on_status(SessionStatus::Done);
                    progress.on_winner(&winner);
                    info!(session = %code, winner = %winner.id, "Session done");
                    return Ok(winner);
                }
                TallyOutcome::Tie(tied) => {
                    self.store.close_poll_round(code, round_number, None).await?;
                    progress.on_tie(round_number, tied.len());
                    info!(session = %code, round = round_number, tied = tied.len(), "Round tied");

                    if round_number + 1 >= self.config.max_tie_rounds {
                        // Repeated identical ties would loop forever; pick
                        // uniformly among the final tied set instead.
                        warn!(
                            session = %code,
                            rounds = self.config.max_tie_rounds,
                            "Tie-round cap reached, picking at random among the tied set"
                        );
                        let winner_id = tied
                            .choose(&mut rand::thread_rng())
                            .cloned()
                            .ok_or(GroupFlowError::MissingWinner)?;
                        let winner = candidates
                            .get(&winner_id)
                            .cloned()
                            .ok_or(GroupFlowError::UnknownCandidate(winner_id))?;
                        self.store.set_winner(code, &winner).await?;
                        progress.on_status(SessionStatus::Done);
                        progress.on_winner(&winner);
                        return Ok(winner);
                    }

                    option_ids = tied;
                    round_number += 1;
                }
            }
        }
    }

    /// Block until the round's vote count reaches the participant count.
    ///
    /// Both evolve concurrently, so each wakeup re-reads both snapshots.
    async fn wait_all_voted(
        &self,
        code: &SessionCode,
        round_number: u32,
        participants_rx: &mut tokio::sync::watch::Receiver<Vec<Participant>>,
        progress: &dyn FlowProgress,
    ) -> Result<tablepick_domain::PollRound, GroupFlowError> {
        let mut round_rx = self.store.watch_poll_round(code, round_number).await?;
        loop {
            let snapshot = round_rx.borrow_and_update().clone();
            let aggregator =
                ParticipantAggregator::new(participants_rx.borrow_and_update().clone());

            if let Some(round) = snapshot {
                progress.on_voting_progress(round_number, round.vote_count(), aggregator.count());
                if round.is_open() && aggregator.all_voted(&round) {
                    return Ok(round);
                }
            }

            tokio::select! {
                changed = round_rx.changed() => {
                    changed.map_err(|_| StoreError::SubscriptionClosed)?;
                }
                changed = participants_rx.changed() => {
                    changed.map_err(|_| StoreError::SubscriptionClosed)?;
                }
            }
        }
    }
}

/// Map round candidate ids back to full candidates, preserving round order.
fn resolve(
    candidates: &CandidateSet,
    ids: &[CandidateId],
) -> Result<Vec<Candidate>, GroupFlowError> {
    ids.iter()
        .map(|id| {
            candidates
                .get(id)
                .cloned()
                .ok_or_else(|| GroupFlowError::UnknownCandidate(id.clone()))
        })
        .collect()
}
