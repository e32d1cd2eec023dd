//! Domain error types

use thiserror::Error;

use crate::candidate::CandidateId;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("The swipe deck is exhausted")]
    DeckEmpty,

    #[error("Cannot build a bracket from an empty candidate list")]
    EmptyBracket,

    #[error("Candidate {0} is not part of the current matchup")]
    NotInMatchup(CandidateId),

    #[error("The bracket already has a winner")]
    BracketFinished,

    #[error("Invalid session status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Cannot tally a round with no votes")]
    NoVotes,

    #[error("Poll round is already closed")]
    RoundClosed,
}
