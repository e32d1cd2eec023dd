//! Interactive stdin adapters for the preference input ports.

use std::io::{self, Write};

use async_trait::async_trait;

use tablepick_application::{JudgeError, MatchupJudge, SwipeFeed, VoteChooser};
use tablepick_domain::{Candidate, CandidateId};

fn prompt(text: &str) -> Result<String, JudgeError> {
    print!("{text}");
    io::stdout()
        .flush()
        .map_err(|e| JudgeError::IoError(e.to_string()))?;
    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .map_err(|e| JudgeError::IoError(e.to_string()))?;
    if read == 0 {
        // EOF
        return Err(JudgeError::Cancelled);
    }
    Ok(line.trim().to_lowercase())
}

fn print_card(candidate: &Candidate) {
    println!();
    println!(
        "  {}  {:.1}* ({} reviews)  {}",
        candidate.name,
        candidate.rating,
        candidate.user_ratings_total,
        candidate.price_display()
    );
    if let Some(cuisine) = candidate.primary_cuisine() {
        println!("  {cuisine}");
    }
    if !candidate.address.is_empty() {
        println!("  {}", candidate.address);
    }
    println!(
        "  {:.1} km away{}",
        candidate.distance_meters / 1000.0,
        if candidate.is_open_now { ", open now" } else { "" }
    );
}

/// Like/pass decisions read from the terminal.
pub struct StdinSwipeFeed;

#[async_trait]
impl SwipeFeed for StdinSwipeFeed {
    async fn decide(&self, candidate: &Candidate) -> Result<bool, JudgeError> {
        print_card(candidate);
        loop {
            match prompt("  Like it? [y/n/q] ")?.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                "q" | "quit" => return Err(JudgeError::Cancelled),
                _ => {}
            }
        }
    }
}

/// Bracket head-to-head picks read from the terminal.
pub struct StdinMatchupJudge;

#[async_trait]
impl MatchupJudge for StdinMatchupJudge {
    async fn pick(&self, a: &Candidate, b: &Candidate) -> Result<CandidateId, JudgeError> {
        println!();
        println!("  1) {}  ({:.1}*)", a.name, a.rating);
        println!("  2) {}  ({:.1}*)", b.name, b.rating);
        loop {
            match prompt("  Which one? [1/2/q] ")?.as_str() {
                "1" => return Ok(a.id.clone()),
                "2" => return Ok(b.id.clone()),
                "q" | "quit" => return Err(JudgeError::Cancelled),
                _ => {}
            }
        }
    }
}

/// Poll round votes read from the terminal.
pub struct StdinVoteChooser;

#[async_trait]
impl VoteChooser for StdinVoteChooser {
    async fn choose(&self, options: &[Candidate]) -> Result<CandidateId, JudgeError> {
        println!();
        println!("  Vote for one:");
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}  ({:.1}*)", i + 1, option.name, option.rating);
        }
        loop {
            let line = prompt("  Your vote: ")?;
            if line == "q" || line == "quit" {
                return Err(JudgeError::Cancelled);
            }
            if let Ok(n) = line.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(options[n - 1].id.clone());
                }
            }
        }
    }
}
