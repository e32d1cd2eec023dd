//! Mutual-likes resolver - what the group votes on.
//!
//! Resolution policy, in priority order:
//! 1. empty participant set → empty result (nothing to resolve)
//! 2. candidates liked by **every** participant (intersection)
//! 3. candidates with the highest like-count (plurality, ties included)
//! 4. nobody liked anything → the full original candidate set, so the group
//!    is still given something to vote on
//!
//! Output preserves the original candidate order, which keeps downstream tie
//! handling deterministic.

use std::collections::HashMap;

use crate::candidate::{Candidate, CandidateId, CandidateSet};
use crate::session::ParticipantId;

/// Resolve the group's shared preference from per-participant swipe maps.
pub fn mutual_likes(
    swipes_by_participant: &HashMap<ParticipantId, HashMap<CandidateId, bool>>,
    candidates: &CandidateSet,
) -> Vec<Candidate> {
    if swipes_by_participant.is_empty() {
        return Vec::new();
    }

    let liked_by = |swipes: &HashMap<CandidateId, bool>, id: &CandidateId| {
        swipes.get(id).copied() == Some(true)
    };

    // Intersection has priority: candidates every participant liked
    let mutual: Vec<Candidate> = candidates
        .iter()
        .filter(|c| {
            swipes_by_participant
                .values()
                .all(|swipes| liked_by(swipes, &c.id))
        })
        .cloned()
        .collect();

    if !mutual.is_empty() {
        return mutual;
    }

    // Fallback: candidates with the most likes
    let like_count = |id: &CandidateId| {
        swipes_by_participant
            .values()
            .filter(|swipes| liked_by(swipes, id))
            .count()
    };

    let max = candidates.iter().map(|c| like_count(&c.id)).max().unwrap_or(0);

    if max == 0 {
        // Last resort: nobody liked anything, vote over everything
        return candidates.iter().cloned().collect();
    }

    candidates
        .iter()
        .filter(|c| like_count(&c.id) == max)
        .cloned()
        .collect()
}
