//! Swipe deck - single-pass consumption of a candidate set.
//!
//! Each participant works through the candidates one at a time, recording a
//! binary like/pass per candidate. The deck exposes the current head plus a
//! short look-ahead (for stacked rendering) and an append-only result list.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateId};
use crate::error::DomainError;

/// A single like/pass decision for one candidate.
///
/// Owned exclusively by the participant who produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeResult {
    pub candidate_id: CandidateId,
    pub liked: bool,
}

/// Finite, single-pass deck over a candidate list.
///
/// Consumption is strictly sequential: [`SwipeDeck::swipe`] pops the head and
/// records the decision; a candidate leaves the deck once swiped and never
/// returns. Re-entrant calls after exhaustion signal
/// [`DomainError::DeckEmpty`].
#[derive(Debug, Clone)]
pub struct SwipeDeck {
    remaining: Vec<Candidate>,
    results: Vec<SwipeResult>,
}

impl SwipeDeck {
    /// Build a deck in the given (shared) candidate order.
    ///
    /// The group flow uses this constructor so every participant traverses
    /// the same sequence.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            remaining: candidates,
            results: Vec::new(),
        }
    }

    /// Build a deck shuffled once at construction.
    ///
    /// Solo-flow only; the order never changes mid-traversal.
    pub fn shuffled(mut candidates: Vec<Candidate>, rng: &mut impl Rng) -> Self {
        candidates.shuffle(rng);
        Self::new(candidates)
    }

    /// The candidate currently on top of the deck.
    pub fn current(&self) -> Option<&Candidate> {
        self.remaining.first()
    }

    /// The next `n` candidates including the head, for stacked rendering.
    pub fn peek(&self, n: usize) -> &[Candidate] {
        &self.remaining[..n.min(self.remaining.len())]
    }

    /// Number of candidates left to swipe.
    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Record a decision for the head candidate and remove it from the deck.
    ///
    /// Returns the recorded result. Swiping an exhausted deck is an error the
    /// caller treats as a "deck empty" signal.
    pub fn swipe(&mut self, liked: bool) -> Result<SwipeResult, DomainError> {
        if self.remaining.is_empty() {
            return Err(DomainError::DeckEmpty);
        }
        let candidate = self.remaining.remove(0);
        let result = SwipeResult {
            candidate_id: candidate.id,
            liked,
        };
        self.results.push(result.clone());
        Ok(result)
    }

    /// All decisions so far, in the order they were made.
    pub fn results(&self) -> &[SwipeResult] {
        &self.results
    }

    /// Ids of liked candidates, in swipe order.
    pub fn liked_ids(&self) -> Vec<CandidateId> {
        self.results
            .iter()
            .filter(|r| r.liked)
            .map(|r| r.candidate_id.clone())
            .collect()
    }
}
