//! Poll rounds - group voting with tie-break rounds.
//!
//! Round 0 is drawn from the mutual-likes output; every later round covers
//! exactly the candidates tied for the lead in the previous round. Rounds are
//! closed exactly once, and no two rounds of a session are ever open at the
//! same time (round creation is host-only and gated on the previous round
//! being closed).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;
use crate::error::DomainError;
use crate::session::ParticipantId;

/// Lifecycle of one poll round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Open,
    Closed,
}

/// One voting pass over a (sub)set of candidates within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollRound {
    /// 0-based, strictly increasing per session.
    pub round_number: u32,
    /// The subset under vote this round; never empty.
    pub candidate_ids: Vec<CandidateId>,
    /// participant id → candidate id; a later write overrides an earlier one
    /// (the replicated store has no vote locking).
    pub votes: HashMap<ParticipantId, CandidateId>,
    pub status: RoundStatus,
    pub winner_id: Option<CandidateId>,
}

impl PollRound {
    pub fn new(round_number: u32, candidate_ids: Vec<CandidateId>) -> Self {
        Self {
            round_number,
            candidate_ids,
            votes: HashMap::new(),
            status: RoundStatus::Open,
            winner_id: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Close the round, recording the unique winner or `None` on a tie.
    ///
    /// A round is closed exactly once; closing a closed round is a defect.
    pub fn close(&mut self, winner_id: Option<CandidateId>) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::RoundClosed);
        }
        self.status = RoundStatus::Closed;
        self.winner_id = winner_id;
        Ok(())
    }

    /// Tally this round's votes (see [`tally_votes`]).
    pub fn tally(&self) -> Result<TallyOutcome, DomainError> {
        tally_votes(&self.votes, &self.candidate_ids)
    }
}

/// Result of tallying one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyOutcome {
    /// Exactly one candidate holds the maximum vote count.
    Winner(CandidateId),
    /// Two or more candidates are tied for the lead; a new round over
    /// exactly this set follows.
    Tie(Vec<CandidateId>),
}

/// Count votes per candidate and find the leader(s).
///
/// `order` fixes the output order of a tie (the round's candidate order), so
/// the result is deterministic regardless of vote arrival order. Only votes
/// for candidates in `order` count; a vote map with no countable votes is a
/// caller error: callers gate on "all voted" before tallying, and the store
/// rejects votes off the round's ballot.
pub fn tally_votes(
    votes: &HashMap<ParticipantId, CandidateId>,
    order: &[CandidateId],
) -> Result<TallyOutcome, DomainError> {
    let mut counts: HashMap<&CandidateId, usize> = HashMap::new();
    for candidate_id in votes.values() {
        if order.contains(candidate_id) {
            *counts.entry(candidate_id).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        return Err(DomainError::NoVotes);
    }

    let max = counts.values().copied().max().unwrap_or(0);
    let mut leaders: Vec<CandidateId> = order
        .iter()
        .filter(|id| counts.get(id).copied() == Some(max))
        .cloned()
        .collect();

    if leaders.len() == 1 {
        Ok(TallyOutcome::Winner(leaders.remove(0)))
    } else {
        Ok(TallyOutcome::Tie(leaders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(pairs: &[(&str, &str)]) -> HashMap<ParticipantId, CandidateId> {
        pairs
            .iter()
            .map(|(p, c)| (ParticipantId::new(*p), CandidateId::new(*c)))
            .collect()
    }

    fn order(ids: &[&str]) -> Vec<CandidateId> {
        ids.iter().map(|id| CandidateId::new(*id)).collect()
    }

    #[test]
    fn test_strict_plurality_yields_winner() {
        let outcome = tally_votes(
            &votes(&[("p1", "a"), ("p2", "b"), ("p3", "a")]),
            &order(&["a", "b"]),
        )
        .unwrap();
        assert_eq!(outcome, TallyOutcome::Winner(CandidateId::new("a")));
    }

    #[test]
    fn test_two_way_tie() {
        let outcome = tally_votes(
            &votes(&[("p1", "a"), ("p2", "b")]),
            &order(&["a", "b", "c"]),
        )
        .unwrap();
        assert_eq!(
            outcome,
            TallyOutcome::Tie(vec![CandidateId::new("a"), CandidateId::new("b")])
        );
    }

    #[test]
    fn test_three_way_tie_covers_full_set() {
        // Tie set equal to the full round set must be representable
        let outcome = tally_votes(
            &votes(&[("p1", "a"), ("p2", "b"), ("p3", "c")]),
            &order(&["a", "b", "c"]),
        )
        .unwrap();
        assert_eq!(outcome, TallyOutcome::Tie(order(&["a", "b", "c"])));
    }

    #[test]
    fn test_tie_order_follows_round_order() {
        let outcome = tally_votes(
            &votes(&[("p1", "c"), ("p2", "a")]),
            &order(&["a", "b", "c"]),
        )
        .unwrap();
        // "a" precedes "c" in the round's candidate order
        assert_eq!(outcome, TallyOutcome::Tie(order(&["a", "c"])));
    }

    #[test]
    fn test_empty_votes_is_a_caller_error() {
        let empty = HashMap::new();
        assert!(matches!(
            tally_votes(&empty, &order(&["a"])),
            Err(DomainError::NoVotes)
        ));
    }

    #[test]
    fn test_vote_off_the_ballot_does_not_count() {
        // A stray vote for a candidate outside the round set cannot shrink
        // (or empty) the leader set
        let outcome = tally_votes(
            &votes(&[("p1", "a"), ("p2", "zzz")]),
            &order(&["a", "b"]),
        )
        .unwrap();
        assert_eq!(outcome, TallyOutcome::Winner(CandidateId::new("a")));
    }

    #[test]
    fn test_only_off_ballot_votes_is_no_votes() {
        let result = tally_votes(
            &votes(&[("p1", "zzz"), ("p2", "zzz")]),
            &order(&["a", "b"]),
        );
        assert!(matches!(result, Err(DomainError::NoVotes)));
    }

    #[test]
    fn test_single_voter_wins_outright() {
        let outcome = tally_votes(&votes(&[("p1", "b")]), &order(&["a", "b"])).unwrap();
        assert_eq!(outcome, TallyOutcome::Winner(CandidateId::new("b")));
    }

    #[test]
    fn test_round_close_is_exactly_once() {
        let mut round = PollRound::new(0, order(&["a", "b"]));
        assert!(round.is_open());
        round.close(Some(CandidateId::new("a"))).unwrap();
        assert_eq!(round.status, RoundStatus::Closed);
        assert!(matches!(round.close(None), Err(DomainError::RoundClosed)));
    }

    #[test]
    fn test_round_tally_delegates() {
        let mut round = PollRound::new(1, order(&["a", "b"]));
        round
            .votes
            .insert(ParticipantId::new("p1"), CandidateId::new("b"));
        assert_eq!(
            round.tally().unwrap(),
            TallyOutcome::Winner(CandidateId::new("b"))
        );
        assert_eq!(round.vote_count(), 1);
    }
}
