//! Elimination bracket - the solo tie-resolution path.
//!
//! The liked candidates are shuffled once, then paired off; each pair is
//! resolved by a binary human pick, and an odd candidate out advances as a
//! bye without a choice. Round winners form the next round until one
//! candidate remains. The human pick is authoritative; nothing at this layer
//! is probabilistic after the initial shuffle.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::candidate::{Candidate, CandidateId};
use crate::error::DomainError;

/// A head-to-head pairing awaiting a human pick.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup<'a> {
    pub a: &'a Candidate,
    pub b: &'a Candidate,
}

/// Single-elimination tournament over a non-empty candidate list.
///
/// # Example
///
/// ```
/// use tablepick_domain::Bracket;
/// # use tablepick_domain::{Candidate, CandidateId};
/// # fn candidate(id: &str) -> Candidate {
/// #     Candidate {
/// #         id: CandidateId::new(id), name: id.into(), rating: 4.0,
/// #         user_ratings_total: 1, price_level: 1, cuisine_tags: vec![],
/// #         address: String::new(), is_open_now: true, distance_meters: 0.0,
/// #     }
/// # }
/// let mut rng = rand::thread_rng();
/// let mut bracket = Bracket::new(
///     vec![candidate("a"), candidate("b"), candidate("c")],
///     &mut rng,
/// ).unwrap();
///
/// while bracket.winner().is_none() {
///     let pick = bracket.current_matchup().unwrap().a.id.clone();
///     bracket.pick(&pick).unwrap();
/// }
/// assert!(bracket.winner().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Bracket {
    /// Candidates still to play in the current round, in match order.
    remaining: Vec<Candidate>,
    /// Winners advancing to the next round.
    advancing: Vec<Candidate>,
    /// 1-based round number; increments when a pairing pass completes.
    round: u32,
    /// Size of the current round when it began (for match labels).
    round_size: usize,
    /// 0-based index of the current matchup within the round.
    matchup_index: usize,
    winner: Option<Candidate>,
}

impl Bracket {
    /// Build a bracket, shuffling the candidate order once.
    ///
    /// A single candidate is the immediate winner (a round of size 1 is
    /// terminal). An empty list is an error; callers are expected to apply
    /// the liked-nothing fallback before constructing a bracket.
    pub fn new(mut candidates: Vec<Candidate>, rng: &mut impl Rng) -> Result<Self, DomainError> {
        if candidates.is_empty() {
            return Err(DomainError::EmptyBracket);
        }
        candidates.shuffle(rng);
        let round_size = candidates.len();
        let mut bracket = Self {
            remaining: candidates,
            advancing: Vec::new(),
            round: 1,
            round_size,
            matchup_index: 0,
            winner: None,
        };
        bracket.settle();
        Ok(bracket)
    }

    /// The pair currently awaiting a pick, or `None` once a winner exists.
    pub fn current_matchup(&self) -> Option<Matchup<'_>> {
        if self.winner.is_some() {
            return None;
        }
        match self.remaining.as_slice() {
            [a, b, ..] => Some(Matchup { a, b }),
            _ => None,
        }
    }

    /// Record the human's pick for the current matchup and advance.
    ///
    /// `winner_id` must identify one of the two candidates in the current
    /// matchup. Byes are promoted automatically; the next call to
    /// [`Bracket::current_matchup`] reflects the following pair (possibly in
    /// the next round).
    pub fn pick(&mut self, winner_id: &CandidateId) -> Result<(), DomainError> {
        if self.winner.is_some() {
            return Err(DomainError::BracketFinished);
        }
        let Some(matchup) = self.current_matchup() else {
            return Err(DomainError::BracketFinished);
        };
        if &matchup.a.id != winner_id && &matchup.b.id != winner_id {
            return Err(DomainError::NotInMatchup(winner_id.clone()));
        }

        let b = self.remaining.remove(1);
        let a = self.remaining.remove(0);
        let winner = if &a.id == winner_id { a } else { b };
        self.advancing.push(winner);
        self.matchup_index += 1;

        self.settle();
        Ok(())
    }

    /// Promote byes and roll completed rounds until a pick is pending or a
    /// winner emerges.
    fn settle(&mut self) {
        loop {
            match self.remaining.len() {
                // Odd candidate out: advances without a choice
                1 => {
                    let bye = self.remaining.remove(0);
                    self.advancing.push(bye);
                }
                0 => {
                    if self.advancing.len() == 1 {
                        self.winner = self.advancing.pop();
                        return;
                    }
                    // Pairing pass complete: winners form the next round
                    self.remaining = std::mem::take(&mut self.advancing);
                    self.round += 1;
                    self.round_size = self.remaining.len();
                    self.matchup_index = 0;
                }
                _ => return,
            }
        }
    }

    /// The champion, once the final match has been decided.
    pub fn winner(&self) -> Option<&Candidate> {
        self.winner.as_ref()
    }

    /// Current round number (1-based).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// 1-based number of the current matchup within the round.
    pub fn matchup_number(&self) -> usize {
        self.matchup_index + 1
    }

    /// Total matchups in the current round (byes excluded).
    pub fn matchups_in_round(&self) -> usize {
        self.round_size / 2
    }
}
