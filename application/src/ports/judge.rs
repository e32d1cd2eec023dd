//! Preference input ports - where human decisions enter the flows.
//!
//! Three small ports cover every point where a flow needs a human (or a test
//! double) to express a preference:
//!
//! - [`SwipeFeed`] - like/pass for the candidate on top of a deck
//! - [`MatchupJudge`] - the authoritative pick in a bracket head-to-head
//! - [`VoteChooser`] - one vote among a poll round's options
//!
//! Interactive adapters live in the CLI; [`LikeAll`], [`ScriptedSwipes`] and
//! [`FirstOption`] are built-in implementations for tests and simulations.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use tablepick_domain::{Candidate, CandidateId};

/// Error type for preference input operations.
#[derive(Error, Debug, Clone)]
pub enum JudgeError {
    /// User cancelled the operation (e.g., via Ctrl+C).
    #[error("Operation cancelled")]
    Cancelled,

    /// Input/output error (e.g., terminal read failure).
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Supplies the like/pass decision for each candidate of a swipe deck.
#[async_trait]
pub trait SwipeFeed: Send + Sync {
    async fn decide(&self, candidate: &Candidate) -> Result<bool, JudgeError>;
}

/// Supplies the human pick for a bracket head-to-head.
#[async_trait]
pub trait MatchupJudge: Send + Sync {
    /// Must return the id of either `a` or `b`.
    async fn pick(&self, a: &Candidate, b: &Candidate) -> Result<CandidateId, JudgeError>;
}

/// Supplies one vote among a poll round's options.
#[async_trait]
pub trait VoteChooser: Send + Sync {
    /// `options` is never empty.
    async fn choose(&self, options: &[Candidate]) -> Result<CandidateId, JudgeError>;
}

/// Likes every candidate. Useful in tests and demos.
pub struct LikeAll;

#[async_trait]
impl SwipeFeed for LikeAll {
    async fn decide(&self, _candidate: &Candidate) -> Result<bool, JudgeError> {
        Ok(true)
    }
}

/// Scripted per-candidate decisions; unknown candidates are passed.
pub struct ScriptedSwipes {
    decisions: HashMap<CandidateId, bool>,
}

impl ScriptedSwipes {
    pub fn new(decisions: impl IntoIterator<Item = (CandidateId, bool)>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
        }
    }

    /// Like exactly the given candidates; pass everything else.
    pub fn liking(ids: impl IntoIterator<Item = CandidateId>) -> Self {
        Self::new(ids.into_iter().map(|id| (id, true)))
    }
}

#[async_trait]
impl SwipeFeed for ScriptedSwipes {
    async fn decide(&self, candidate: &Candidate) -> Result<bool, JudgeError> {
        Ok(self.decisions.get(&candidate.id).copied().unwrap_or(false))
    }
}

/// Always picks the first option offered.
pub struct FirstOption;

#[async_trait]
impl MatchupJudge for FirstOption {
    async fn pick(&self, a: &Candidate, _b: &Candidate) -> Result<CandidateId, JudgeError> {
        Ok(a.id.clone())
    }
}

#[async_trait]
impl VoteChooser for FirstOption {
    async fn choose(&self, options: &[Candidate]) -> Result<CandidateId, JudgeError> {
        Ok(options[0].id.clone())
    }
}

/// Always votes for a fixed candidate when present, else the first option.
pub struct Preferring(pub CandidateId);

#[async_trait]
impl VoteChooser for Preferring {
    async fn choose(&self, options: &[Candidate]) -> Result<CandidateId, JudgeError> {
        let found = options.iter().find(|c| c.id == self.0);
        Ok(found.map(|c| c.id.clone()).unwrap_or_else(|| options[0].id.clone()))
    }
}
