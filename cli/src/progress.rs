//! Console progress reporting for the decision flows.

use tablepick_application::FlowProgress;
use tablepick_domain::{Candidate, SessionStatus};

/// Prints flow progress as plain status lines.
pub struct ConsoleProgress {
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl FlowProgress for ConsoleProgress {
    fn on_status(&self, status: SessionStatus) {
        if !self.quiet {
            println!("-- {status}");
        }
    }

    fn on_swiping_progress(&self, done: usize, total: usize) {
        if !self.quiet && total > 0 {
            println!("-- swiping: {done}/{total} done");
        }
    }

    fn on_round_opened(&self, round_number: u32, options: &[Candidate]) {
        if !self.quiet {
            let names: Vec<&str> = options.iter().map(|c| c.name.as_str()).collect();
            println!("-- round {round_number}: {}", names.join(" vs "));
        }
    }

    fn on_voting_progress(&self, round_number: u32, votes: usize, total: usize) {
        if !self.quiet && total > 0 {
            println!("-- round {round_number}: {votes}/{total} votes in");
        }
    }

    fn on_tie(&self, round_number: u32, tied: usize) {
        if !self.quiet {
            println!("-- round {round_number} tied between {tied} places, voting again");
        }
    }

    fn on_winner(&self, winner: &Candidate) {
        if !self.quiet {
            println!("-- winner: {}", winner.name);
        }
    }
}
