//! Domain layer for tablepick
//!
//! This crate contains the core decision-resolution logic: candidate sets,
//! the swipe deck, the solo elimination bracket, the shared session state
//! machine, and the group resolvers (mutual likes, poll tally). It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Solo flow
//!
//! Candidate Set → Swipe Deck → Elimination Bracket → winner.
//!
//! ## Group flow
//!
//! Candidate Set → per-participant Swipe Decks → Mutual-Likes Resolver →
//! (singleton) winner, or Poll rounds with tie-breaks → winner. The group
//! flow is coordinated through an eventually-consistent replicated store;
//! this crate only defines the values that travel through it and the pure
//! functions that resolve them.

pub mod bracket;
pub mod candidate;
pub mod error;
pub mod mutual;
pub mod poll;
pub mod session;
pub mod swipe;

// Re-export commonly used types
pub use bracket::{Bracket, Matchup};
pub use candidate::{Candidate, CandidateId, CandidateSet, SearchFilters};
pub use error::DomainError;
pub use mutual::mutual_likes;
pub use poll::{PollRound, RoundStatus, TallyOutcome, tally_votes};
pub use session::{Participant, ParticipantId, Session, SessionCode, SessionStatus};
pub use swipe::{SwipeDeck, SwipeResult};
