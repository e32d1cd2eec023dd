//! Run solo flow use case
//!
//! The single-user path: swipe a shuffled deck, then resolve the liked set
//! through an elimination bracket. No store involved; the two preference
//! ports are the only seams.

use rand::thread_rng;
use thiserror::Error;
use tracing::{debug, info};

use tablepick_domain::{Bracket, Candidate, CandidateSet, DomainError, SwipeDeck};

use crate::ports::judge::{JudgeError, MatchupJudge, SwipeFeed};
use crate::ports::progress::{FlowProgress, NoProgress};

/// Errors that can occur during the solo flow
#[derive(Error, Debug)]
pub enum SoloFlowError {
    #[error("No candidates to decide between")]
    NoCandidates,

    #[error("Preference input failed: {0}")]
    Input(#[from] JudgeError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Use case for running a solo decision.
#[derive(Default)]
pub struct RunSoloFlowUseCase;

impl RunSoloFlowUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Execute the flow with default (no-op) progress.
    pub async fn execute(
        &self,
        candidates: CandidateSet,
        feed: &dyn SwipeFeed,
        judge: &dyn MatchupJudge,
    ) -> Result<Candidate, SoloFlowError> {
        self.execute_with_progress(candidates, feed, judge, &NoProgress)
            .await
    }

    /// Swipe the whole deck, then bracket the liked candidates to one winner.
    ///
    /// Shortcuts mirror the deck outcome: liked nothing → the highest-rated
    /// original candidate; liked exactly one → that candidate, no bracket.
    pub async fn execute_with_progress(
        &self,
        candidates: CandidateSet,
        feed: &dyn SwipeFeed,
        judge: &dyn MatchupJudge,
        progress: &dyn FlowProgress,
    ) -> Result<Candidate, SoloFlowError> {
        if candidates.is_empty() {
            return Err(SoloFlowError::NoCandidates);
        }

        // Solo decks are shuffled once at construction, never mid-traversal
        let mut deck = SwipeDeck::shuffled(candidates.as_slice().to_vec(), &mut thread_rng());
        while let Some(candidate) = deck.current() {
            let liked = feed.decide(candidate).await?;
            deck.swipe(liked)?;
        }

        let liked: Vec<Candidate> = deck
            .liked_ids()
            .iter()
            .filter_map(|id| candidates.get(id).cloned())
            .collect();
        debug!(liked = liked.len(), total = candidates.len(), "Deck exhausted");

        let winner = match liked.as_slice() {
            [] => {
                // Liked nothing: fall back to the highest-rated candidate
                candidates
                    .top_rated()
                    .cloned()
                    .ok_or(SoloFlowError::NoCandidates)?
            }
            [only] => only.clone(),
            _ => self.run_bracket(liked, judge, progress).await?,
        };

        info!(winner = %winner.id, "Solo flow finished");
        progress.on_winner(&winner);
        Ok(winner)
    }

    async fn run_bracket(
        &self,
        liked: Vec<Candidate>,
        judge: &dyn MatchupJudge,
        progress: &dyn FlowProgress,
    ) -> Result<Candidate, SoloFlowError> {
        let mut bracket = Bracket::new(liked, &mut thread_rng())?;

        while let Some(matchup) = bracket.current_matchup() {
            let pick = judge.pick(matchup.a, matchup.b).await?;
            bracket.pick(&pick)?;
        }

        bracket
            .winner()
            .cloned()
            .ok_or(SoloFlowError::NoCandidates)
    }
}
