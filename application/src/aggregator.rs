//! Participant aggregator - derived predicates over the live participant set.
//!
//! The aggregator wraps one participants snapshot from the store watch
//! stream. Because participant count and done-state both evolve
//! concurrently, the predicates are recomputed from a fresh snapshot on
//! every store notification; an aggregator is never kept across
//! notifications.

use std::collections::HashMap;

use tablepick_domain::{CandidateId, Participant, ParticipantId, PollRound};

/// One-snapshot view over a session's participants.
#[derive(Debug, Clone)]
pub struct ParticipantAggregator {
    participants: Vec<Participant>,
}

impl ParticipantAggregator {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn count(&self) -> usize {
        self.participants.len()
    }

    pub fn done_count(&self) -> usize {
        self.participants.iter().filter(|p| p.done_swiping).count()
    }

    /// Every participant finished swiping. An empty participant set is never
    /// "all done".
    pub fn all_done(&self) -> bool {
        !self.participants.is_empty() && self.participants.iter().all(|p| p.done_swiping)
    }

    /// The round's vote count has reached the current participant count.
    pub fn all_voted(&self, round: &PollRound) -> bool {
        !self.participants.is_empty() && round.vote_count() >= self.count()
    }

    /// participant id → (candidate id → liked), the mutual-likes input.
    pub fn swipes_by_participant(&self) -> HashMap<ParticipantId, HashMap<CandidateId, bool>> {
        self.participants
            .iter()
            .map(|p| (p.id.clone(), p.swipes.clone()))
            .collect()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }
}
