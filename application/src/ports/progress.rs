//! Flow progress notification port
//!
//! Defines the interface for reporting progress while a decision flow runs.

use tablepick_domain::{Candidate, SessionStatus};

/// Callback for progress updates during a decision flow
///
/// Implementations live in the presentation layer and can display progress
/// in various ways (console, web UI, etc.)
pub trait FlowProgress: Send + Sync {
    /// Called when the session status changes.
    fn on_status(&self, _status: SessionStatus) {}

    /// Called on every participants snapshot with done/total counts.
    fn on_swiping_progress(&self, _done: usize, _total: usize) {}

    /// Called when a poll round opens.
    fn on_round_opened(&self, _round_number: u32, _options: &[Candidate]) {}

    /// Called on every round snapshot with voted/total counts.
    fn on_voting_progress(&self, _round_number: u32, _votes: usize, _total: usize) {}

    /// Called when a round closes in a tie.
    fn on_tie(&self, _round_number: u32, _tied: usize) {}

    /// Called once when the winner is decided.
    fn on_winner(&self, _winner: &Candidate) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl FlowProgress for NoProgress {}
