//! In-process decision store
//!
//! A [`tokio::sync::watch`]-based implementation of the `DecisionStore`
//! port. Each document (session, participant collection, poll round) is a
//! watch channel: every write publishes a complete fresh snapshot to all
//! subscribers, which matches the replicated-store contract the use cases
//! are written against — last-write-wins per field, per-document write
//! ordering, no cross-document atomicity.
//!
//! Backs the CLI demo and the integration tests. Subscribing to a document
//! that does not exist yet is allowed; subscribers see `None` (or an empty
//! participant list) until the first write lands.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;

use tablepick_application::ports::decision_store::{DecisionStore, StoreError};
use tablepick_domain::{
    Candidate, CandidateId, Participant, ParticipantId, PollRound, Session, SessionCode,
    SessionStatus,
};

/// The documents of one session.
struct SessionDocs {
    session: watch::Sender<Option<Session>>,
    participants: watch::Sender<Vec<Participant>>,
    rounds: HashMap<u32, watch::Sender<Option<PollRound>>>,
}

impl SessionDocs {
    fn new() -> Self {
        Self {
            session: watch::channel(None).0,
            participants: watch::channel(Vec::new()).0,
            rounds: HashMap::new(),
        }
    }
}

/// In-process `DecisionStore` adapter.
#[derive(Default)]
pub struct MemoryDecisionStore {
    sessions: Mutex<HashMap<SessionCode, SessionDocs>>,
}

impl MemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` over the (lazily created) documents of `code`.
    fn with_docs<T>(&self, code: &SessionCode, f: impl FnOnce(&mut SessionDocs) -> T) -> T {
        let mut sessions = self.sessions.lock().expect("store mutex poisoned");
        let docs = sessions.entry(code.clone()).or_insert_with(SessionDocs::new);
        f(docs)
    }

    /// Validate-and-replace the session document.
    fn update_session(
        &self,
        code: &SessionCode,
        f: impl FnOnce(&mut Session) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.with_docs(code, |docs| {
            let mut session = docs
                .session
                .borrow()
                .clone()
                .ok_or_else(|| StoreError::SessionNotFound(code.clone()))?;
            f(&mut session)?;
            docs.session.send_replace(Some(session));
            Ok(())
        })
    }

    /// Validate-and-replace one round document.
    fn update_round(
        &self,
        code: &SessionCode,
        round_number: u32,
        f: impl FnOnce(&mut PollRound) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.with_docs(code, |docs| {
            let sender = docs
                .rounds
                .get(&round_number)
                .ok_or(StoreError::RoundNotFound(round_number))?;
            let mut round = sender
                .borrow()
                .clone()
                .ok_or(StoreError::RoundNotFound(round_number))?;
            f(&mut round)?;
            sender.send_replace(Some(round));
            Ok(())
        })
    }
}

#[async_trait]
impl DecisionStore for MemoryDecisionStore {
    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        let code = session.id.clone();
        self.with_docs(&code, |docs| {
            if docs.session.borrow().is_some() {
                return Err(StoreError::SessionExists(code.clone()));
            }
            docs.session.send_replace(Some(session));
            Ok(())
        })
    }

    async fn update_session_status(
        &self,
        code: &SessionCode,
        status: SessionStatus,
    ) -> Result<(), StoreError> {
        self.update_session(code, |session| {
            let from = session.status;
            session
                .advance(status)
                .map_err(|_| StoreError::InvalidTransition { from, to: status })
        })
    }

    async fn set_winner(&self, code: &SessionCode, winner: &Candidate) -> Result<(), StoreError> {
        self.update_session(code, |session| {
            let from = session.status;
            session.advance(SessionStatus::Done).map_err(|_| {
                StoreError::InvalidTransition {
                    from,
                    to: SessionStatus::Done,
                }
            })?;
            session.winner_id = Some(winner.id.clone());
            session.winner_name = Some(winner.name.clone());
            Ok(())
        })
    }

    async fn join_participant(
        &self,
        code: &SessionCode,
        participant: Participant,
    ) -> Result<(), StoreError> {
        self.with_docs(code, |docs| {
            if docs.session.borrow().is_none() {
                return Err(StoreError::SessionNotFound(code.clone()));
            }
            docs.participants.send_modify(|participants| {
                // Re-joining replaces the existing document in place
                match participants.iter_mut().find(|p| p.id == participant.id) {
                    Some(existing) => *existing = participant,
                    None => participants.push(participant),
                }
            });
            Ok(())
        })
    }

    async fn record_swipe(
        &self,
        code: &SessionCode,
        participant_id: &ParticipantId,
        candidate_id: CandidateId,
        liked: bool,
    ) -> Result<(), StoreError> {
        self.with_docs(code, |docs| {
            let mut found = false;
            docs.participants.send_modify(|participants| {
                if let Some(p) = participants.iter_mut().find(|p| &p.id == participant_id) {
                    // Single-key merge: other swipes are untouched
                    p.swipes.insert(candidate_id, liked);
                    found = true;
                }
            });
            if found {
                Ok(())
            } else {
                Err(StoreError::ParticipantNotFound(participant_id.clone()))
            }
        })
    }

    async fn mark_done_swiping(
        &self,
        code: &SessionCode,
        participant_id: &ParticipantId,
    ) -> Result<(), StoreError> {
        self.with_docs(code, |docs| {
            let mut found = false;
            docs.participants.send_modify(|participants| {
                if let Some(p) = participants.iter_mut().find(|p| &p.id == participant_id) {
                    p.done_swiping = true;
                    p.done_swiping_at = Some(Utc::now());
                    found = true;
                }
            });
            if found {
                Ok(())
            } else {
                Err(StoreError::ParticipantNotFound(participant_id.clone()))
            }
        })
    }

    async fn create_poll_round(
        &self,
        code: &SessionCode,
        round_number: u32,
        candidate_ids: Vec<CandidateId>,
    ) -> Result<(), StoreError> {
        self.with_docs(code, |docs| {
            if docs.session.borrow().is_none() {
                return Err(StoreError::SessionNotFound(code.clone()));
            }
            // No two open rounds may coexist
            for (number, sender) in &docs.rounds {
                let open = sender.borrow().as_ref().is_some_and(PollRound::is_open);
                if open {
                    return Err(StoreError::PreviousRoundOpen(*number));
                }
            }
            let sender = docs
                .rounds
                .entry(round_number)
                .or_insert_with(|| watch::channel(None).0);
            if sender.borrow().is_some() {
                return Err(StoreError::RoundExists(round_number));
            }
            sender.send_replace(Some(PollRound::new(round_number, candidate_ids)));
            Ok(())
        })
    }

    async fn cast_vote(
        &self,
        code: &SessionCode,
        round_number: u32,
        participant_id: &ParticipantId,
        candidate_id: CandidateId,
    ) -> Result<(), StoreError> {
        self.update_round(code, round_number, |round| {
            if !round.is_open() {
                return Err(StoreError::RoundAlreadyClosed(round_number));
            }
            if !round.candidate_ids.contains(&candidate_id) {
                return Err(StoreError::VoteNotInRound {
                    round_number,
                    candidate_id,
                });
            }
            // Single-key merge; a re-vote overrides (last write wins)
            round.votes.insert(participant_id.clone(), candidate_id);
            Ok(())
        })
    }

    async fn close_poll_round(
        &self,
        code: &SessionCode,
        round_number: u32,
        winner_id: Option<CandidateId>,
    ) -> Result<(), StoreError> {
        self.update_round(code, round_number, |round| {
            round
                .close(winner_id)
                .map_err(|_| StoreError::RoundAlreadyClosed(round_number))
        })
    }

    async fn watch_session(
        &self,
        code: &SessionCode,
    ) -> Result<watch::Receiver<Option<Session>>, StoreError> {
        Ok(self.with_docs(code, |docs| docs.session.subscribe()))
    }

    async fn watch_participants(
        &self,
        code: &SessionCode,
    ) -> Result<watch::Receiver<Vec<Participant>>, StoreError> {
        Ok(self.with_docs(code, |docs| docs.participants.subscribe()))
    }

    async fn watch_poll_round(
        &self,
        code: &SessionCode,
        round_number: u32,
    ) -> Result<watch::Receiver<Option<PollRound>>, StoreError> {
        Ok(self.with_docs(code, |docs| {
            docs.rounds
                .entry(round_number)
                .or_insert_with(|| watch::channel(None).0)
                .subscribe()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use tablepick_application::ports::judge::{JudgeError, LikeAll, Preferring, VoteChooser};
    use tablepick_application::{
        BehaviorConfig, HostGroupFlowUseCase, JoinGroupFlowUseCase, ScriptedSwipes,
    };
    use tablepick_domain::CandidateSet;

    fn candidate(id: &str) -> Candidate {
        Candidate {
            id: CandidateId::new(id),
            name: id.to_uppercase(),
            rating: 4.2,
            user_ratings_total: 50,
            price_level: 2,
            cuisine_tags: vec!["thai".to_string()],
            address: "2 Side St".to_string(),
            is_open_now: true,
            distance_meters: 400.0,
        }
    }

    fn candidates(ids: &[&str]) -> CandidateSet {
        CandidateSet::new(ids.iter().map(|id| candidate(id)).collect())
    }

    fn session(code: &str, ids: &[&str]) -> Session {
        Session::new(
            SessionCode::new(code),
            ParticipantId::new("host"),
            candidates(ids),
            Utc::now(),
        )
    }

    // ==================== Store semantics ====================

    #[tokio::test]
    async fn test_create_session_and_watch() {
        let store = MemoryDecisionStore::new();
        let code = SessionCode::new("AAA111");

        // Subscribing before creation sees None
        let rx = store.watch_session(&code).await.unwrap();
        assert!(rx.borrow().is_none());

        store.create_session(session("AAA111", &["a"])).await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().status, SessionStatus::Waiting);

        // Duplicate codes are rejected, not silently overwritten
        let result = store.create_session(session("AAA111", &["b"])).await;
        assert!(matches!(result, Err(StoreError::SessionExists(_))));
    }

    #[tokio::test]
    async fn test_status_writes_are_forward_only_and_idempotent() {
        let store = MemoryDecisionStore::new();
        let code = SessionCode::new("BBB222");
        store.create_session(session("BBB222", &["a"])).await.unwrap();

        store
            .update_session_status(&code, SessionStatus::Swiping)
            .await
            .unwrap();
        // Same-value write: harmless (two observers racing the transition)
        store
            .update_session_status(&code, SessionStatus::Swiping)
            .await
            .unwrap();
        // Backward write: rejected
        let result = store
            .update_session_status(&code, SessionStatus::Waiting)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
        // Skipping: rejected
        let result = store.update_session_status(&code, SessionStatus::Done).await;
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_record_swipe_merges_single_key() {
        let store = MemoryDecisionStore::new();
        let code = SessionCode::new("CCC333");
        store.create_session(session("CCC333", &["a", "b"])).await.unwrap();

        let pid = ParticipantId::new("p1");
        store
            .join_participant(&code, Participant::new(pid.clone(), "P1", Utc::now()))
            .await
            .unwrap();

        store
            .record_swipe(&code, &pid, CandidateId::new("a"), true)
            .await
            .unwrap();
        store
            .record_swipe(&code, &pid, CandidateId::new("b"), false)
            .await
            .unwrap();

        let rx = store.watch_participants(&code).await.unwrap();
        let participants = rx.borrow().clone();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].swipes[&CandidateId::new("a")], true);
        assert_eq!(participants[0].swipes[&CandidateId::new("b")], false);

        // Unknown participants are surfaced, not created implicitly
        let result = store
            .record_swipe(&code, &ParticipantId::new("ghost"), CandidateId::new("a"), true)
            .await;
        assert!(matches!(result, Err(StoreError::ParticipantNotFound(_))));
    }

    #[tokio::test]
    async fn test_round_lifecycle() {
        let store = MemoryDecisionStore::new();
        let code = SessionCode::new("DDD444");
        store.create_session(session("DDD444", &["a", "b"])).await.unwrap();

        // Watching an uncreated round sees None until it opens
        let round_rx = store.watch_poll_round(&code, 0).await.unwrap();
        assert!(round_rx.borrow().is_none());

        store
            .create_poll_round(&code, 0, vec![CandidateId::new("a"), CandidateId::new("b")])
            .await
            .unwrap();
        assert!(round_rx.borrow().as_ref().unwrap().is_open());

        // A second open round may not coexist
        let result = store.create_poll_round(&code, 1, vec![CandidateId::new("a")]).await;
        assert!(matches!(result, Err(StoreError::PreviousRoundOpen(0))));

        let pid = ParticipantId::new("p1");
        store
            .cast_vote(&code, 0, &pid, CandidateId::new("a"))
            .await
            .unwrap();
        // Re-vote overrides: last write wins
        store
            .cast_vote(&code, 0, &pid, CandidateId::new("b"))
            .await
            .unwrap();
        assert_eq!(
            round_rx.borrow().as_ref().unwrap().votes[&pid],
            CandidateId::new("b")
        );

        store.close_poll_round(&code, 0, None).await.unwrap();
        // Closed exactly once
        let result = store.close_poll_round(&code, 0, None).await;
        assert!(matches!(result, Err(StoreError::RoundAlreadyClosed(0))));
        // Votes on a closed round are rejected
        let result = store.cast_vote(&code, 0, &pid, CandidateId::new("a")).await;
        assert!(matches!(result, Err(StoreError::RoundAlreadyClosed(0))));

        // The previous round closed, so the next may open
        store
            .create_poll_round(&code, 1, vec![CandidateId::new("a")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_vote_off_the_ballot_is_rejected() {
        let store = MemoryDecisionStore::new();
        let code = SessionCode::new("FFF666");
        store.create_session(session("FFF666", &["a", "b"])).await.unwrap();

        store
            .create_poll_round(&code, 0, vec![CandidateId::new("a"), CandidateId::new("b")])
            .await
            .unwrap();

        // A vote for a candidate outside the round set never enters the map;
        // otherwise a tally over the ballot could come up empty
        let pid = ParticipantId::new("p1");
        let result = store.cast_vote(&code, 0, &pid, CandidateId::new("zzz")).await;
        assert!(matches!(
            result,
            Err(StoreError::VoteNotInRound { round_number: 0, .. })
        ));

        let rx = store.watch_poll_round(&code, 0).await.unwrap();
        assert!(rx.borrow().as_ref().unwrap().votes.is_empty());

        // A ballot candidate is still accepted afterwards
        store.cast_vote(&code, 0, &pid, CandidateId::new("a")).await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().unwrap().votes[&pid],
            CandidateId::new("a")
        );
    }

    #[tokio::test]
    async fn test_watch_delivers_fresh_snapshots() {
        let store = MemoryDecisionStore::new();
        let code = SessionCode::new("EEE555");
        store.create_session(session("EEE555", &["a"])).await.unwrap();

        let mut rx = store.watch_participants(&code).await.unwrap();
        rx.borrow_and_update();

        store
            .join_participant(&code, Participant::new(ParticipantId::new("p1"), "P1", Utc::now()))
            .await
            .unwrap();

        timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("notification should arrive")
            .unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }

    // ==================== End-to-end group flows ====================

    /// Votes a fixed script, one entry per round.
    struct VoteScript(Mutex<VecDeque<CandidateId>>);

    impl VoteScript {
        fn new(votes: &[&str]) -> Self {
            Self(Mutex::new(votes.iter().map(|v| CandidateId::new(*v)).collect()))
        }
    }

    #[async_trait]
    impl VoteChooser for VoteScript {
        async fn choose(&self, _options: &[Candidate]) -> Result<CandidateId, JudgeError> {
            self.0
                .lock()
                .expect("script mutex poisoned")
                .pop_front()
                .ok_or_else(|| JudgeError::IoError("vote script exhausted".to_string()))
        }
    }

    struct Group {
        store: Arc<MemoryDecisionStore>,
        host: HostGroupFlowUseCase<MemoryDecisionStore>,
        join: JoinGroupFlowUseCase<MemoryDecisionStore>,
        code: SessionCode,
    }

    async fn group(code: &str, ids: &[&str], config: BehaviorConfig) -> Group {
        let store = Arc::new(MemoryDecisionStore::new());
        let host = HostGroupFlowUseCase::new(Arc::clone(&store)).with_config(config);
        let join = JoinGroupFlowUseCase::new(Arc::clone(&store));
        let code = SessionCode::new(code);
        host.create_session(code.clone(), "host", "Host", candidates(ids))
            .await
            .unwrap();
        Group { store, host, join, code }
    }

    /// Scenario: both participants like only A → mutual likes is the
    /// singleton [A] → session done with winner A, no poll round created.
    #[tokio::test]
    async fn test_unanimous_singleton_skips_the_poll() {
        let g = group("FFF666", &["a", "b", "c"], BehaviorConfig::default()).await;

        let host_seat = g.join.join(&g.code, "host", "Host").await.unwrap();
        let guest_seat = g.join.join(&g.code, "p2", "Ana").await.unwrap();

        let observer = {
            let code = g.code.clone();
            let host = HostGroupFlowUseCase::new(Arc::clone(&g.store));
            tokio::spawn(async move { host.run(&code).await })
        };

        g.host.start_swiping(&g.code).await.unwrap();

        let only_a = || ScriptedSwipes::liking([CandidateId::new("a")]);
        let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
        let p1 = tokio::spawn({
            let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
            async move { join.run(&host_seat, &only_a(), &FirstVote).await }
        });
        let p2 = tokio::spawn(async move { join.run(&guest_seat, &only_a(), &FirstVote).await });

        let winner = timeout(Duration::from_secs(5), observer)
            .await
            .expect("observer should finish")
            .unwrap()
            .unwrap();
        assert_eq!(winner.id.as_str(), "a");
        assert_eq!(p1.await.unwrap().unwrap().id.as_str(), "a");
        assert_eq!(p2.await.unwrap().unwrap().id.as_str(), "a");

        // No poll round was ever created
        let round_rx = g.store.watch_poll_round(&g.code, 0).await.unwrap();
        assert!(round_rx.borrow().is_none());
    }

    /// Votes for the first option of every round.
    struct FirstVote;

    #[async_trait]
    impl VoteChooser for FirstVote {
        async fn choose(&self, options: &[Candidate]) -> Result<CandidateId, JudgeError> {
            Ok(options[0].id.clone())
        }
    }

    /// Scenario: everyone likes everything, votes {p1:A, p2:B, p3:A} →
    /// tally A=2, B=1 → unique winner A, round closed, session done.
    #[tokio::test]
    async fn test_majority_vote_wins_round_zero() {
        let g = group("GGG777", &["a", "b"], BehaviorConfig::default()).await;

        let seats = [
            g.join.join(&g.code, "host", "Host").await.unwrap(),
            g.join.join(&g.code, "p2", "Ben").await.unwrap(),
            g.join.join(&g.code, "p3", "Cho").await.unwrap(),
        ];
        let choosers = [
            Preferring(CandidateId::new("a")),
            Preferring(CandidateId::new("b")),
            Preferring(CandidateId::new("a")),
        ];

        let observer = {
            let code = g.code.clone();
            let host = HostGroupFlowUseCase::new(Arc::clone(&g.store));
            tokio::spawn(async move { host.run(&code).await })
        };
        g.host.start_swiping(&g.code).await.unwrap();

        let mut tasks = Vec::new();
        for (seat, chooser) in seats.into_iter().zip(choosers) {
            let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
            tasks.push(tokio::spawn(async move {
                join.run(&seat, &LikeAll, &chooser).await
            }));
        }

        let winner = timeout(Duration::from_secs(5), observer)
            .await
            .expect("observer should finish")
            .unwrap()
            .unwrap();
        assert_eq!(winner.id.as_str(), "a");
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().id.as_str(), "a");
        }

        let round_rx = g.store.watch_poll_round(&g.code, 0).await.unwrap();
        let round = round_rx.borrow().clone().unwrap();
        assert!(!round.is_open());
        assert_eq!(round.winner_id, Some(CandidateId::new("a")));
    }

    /// Scenario: round 0 ties (p1:A, p2:B), round 1 resolves (both A).
    #[tokio::test]
    async fn test_tie_opens_a_second_round_over_the_tied_set() {
        let g = group("HHH888", &["a", "b", "c"], BehaviorConfig::default()).await;

        let seat1 = g.join.join(&g.code, "host", "Host").await.unwrap();
        let seat2 = g.join.join(&g.code, "p2", "Dee").await.unwrap();

        let observer = {
            let code = g.code.clone();
            let host = HostGroupFlowUseCase::new(Arc::clone(&g.store));
            tokio::spawn(async move { host.run(&code).await })
        };
        g.host.start_swiping(&g.code).await.unwrap();

        // Both like a and b (not c) → round 0 over [a, b]
        let likes = || ScriptedSwipes::liking([CandidateId::new("a"), CandidateId::new("b")]);
        let p1 = tokio::spawn({
            let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
            let script = VoteScript::new(&["a", "a"]);
            async move { join.run(&seat1, &likes(), &script).await }
        });
        let p2 = tokio::spawn({
            let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
            let script = VoteScript::new(&["b", "a"]);
            async move { join.run(&seat2, &likes(), &script).await }
        });

        let winner = timeout(Duration::from_secs(5), observer)
            .await
            .expect("observer should finish")
            .unwrap()
            .unwrap();
        assert_eq!(winner.id.as_str(), "a");
        p1.await.unwrap().unwrap();
        p2.await.unwrap().unwrap();

        // Round 0 closed in a tie; round 1 covers exactly the tied set
        let round0 = g.store.watch_poll_round(&g.code, 0).await.unwrap().borrow().clone().unwrap();
        assert!(!round0.is_open());
        assert_eq!(round0.winner_id, None);

        let round1 = g.store.watch_poll_round(&g.code, 1).await.unwrap().borrow().clone().unwrap();
        assert_eq!(
            round1.candidate_ids,
            vec![CandidateId::new("a"), CandidateId::new("b")]
        );
        assert_eq!(round1.winner_id, Some(CandidateId::new("a")));
    }

    /// Repeated identical ties must not loop forever: after the configured
    /// number of tied rounds the host picks among the tied set at random,
    /// and round numbers stay monotonic throughout.
    #[tokio::test]
    async fn test_repeated_identical_ties_hit_the_round_cap() {
        let config = BehaviorConfig {
            max_tie_rounds: 3,
            ..BehaviorConfig::default()
        };
        let g = group("JJJ999", &["a", "b"], config.clone()).await;

        let seat1 = g.join.join(&g.code, "host", "Host").await.unwrap();
        let seat2 = g.join.join(&g.code, "p2", "Eli").await.unwrap();

        let observer = {
            let code = g.code.clone();
            let host = HostGroupFlowUseCase::new(Arc::clone(&g.store)).with_config(config);
            tokio::spawn(async move { host.run(&code).await })
        };
        g.host.start_swiping(&g.code).await.unwrap();

        // Each participant stubbornly votes their own favorite every round
        let p1 = tokio::spawn({
            let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
            async move { join.run(&seat1, &LikeAll, &Preferring(CandidateId::new("a"))).await }
        });
        let p2 = tokio::spawn({
            let join = JoinGroupFlowUseCase::new(Arc::clone(&g.store));
            async move { join.run(&seat2, &LikeAll, &Preferring(CandidateId::new("b"))).await }
        });

        let winner = timeout(Duration::from_secs(5), observer)
            .await
            .expect("observer should finish despite repeated ties")
            .unwrap()
            .unwrap();
        assert!(["a", "b"].contains(&winner.id.as_str()));
        p1.await.unwrap().unwrap();
        p2.await.unwrap().unwrap();

        // Rounds 0..cap-1 all closed tied, each over the same tied set
        for n in 0..2u32 {
            let round = g.store.watch_poll_round(&g.code, n).await.unwrap().borrow().clone().unwrap();
            assert!(!round.is_open());
            assert_eq!(round.winner_id, None, "round {n} closed in a tie");
        }
        // No round beyond the cap was opened
        let beyond = g.store.watch_poll_round(&g.code, 3).await.unwrap();
        assert!(beyond.borrow().is_none());
    }
}
