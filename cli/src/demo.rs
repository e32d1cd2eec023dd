//! Built-in sample deck and simulated participants.
//!
//! Used when no places API key or location is configured, and to fill a
//! group session with non-interactive guests.

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;

use tablepick_application::{JudgeError, SwipeFeed, VoteChooser};
use tablepick_domain::{Candidate, CandidateId, CandidateSet};

/// A fixed deck of plausible places for offline runs.
pub fn sample_set() -> CandidateSet {
    let entries: &[(&str, &str, f32, u32, u8, &str, f64)] = &[
        ("s1", "Menya Kaiju", 4.6, 812, 2, "ramen", 350.0),
        ("s2", "La Piccola Nonna", 4.4, 523, 3, "italian", 900.0),
        ("s3", "Taqueria El Paso", 4.2, 1204, 1, "mexican", 650.0),
        ("s4", "Green Bowl", 4.1, 233, 2, "salad", 210.0),
        ("s5", "Seoul Garden", 4.5, 678, 2, "korean bbq", 1100.0),
        ("s6", "The Brass Owl", 4.0, 455, 3, "gastropub", 780.0),
        ("s7", "Banh Mi Corner", 4.7, 309, 1, "vietnamese", 430.0),
        ("s8", "Trattoria Lupo", 4.3, 587, 3, "italian", 1500.0),
        ("s9", "Curry Leaf", 4.4, 721, 2, "indian", 560.0),
        ("s10", "Ocean & Vine", 4.2, 198, 4, "seafood", 1900.0),
    ];
    CandidateSet::new(
        entries
            .iter()
            .map(|&(id, name, rating, reviews, price, cuisine, dist)| Candidate {
                id: CandidateId::new(id),
                name: name.to_string(),
                rating,
                user_ratings_total: reviews,
                price_level: price,
                cuisine_tags: vec![cuisine.to_string()],
                address: String::new(),
                is_open_now: true,
                distance_meters: dist,
            })
            .collect(),
    )
}

/// Likes each candidate with a fixed probability.
pub struct RandomSwipes {
    pub like_probability: f64,
}

impl Default for RandomSwipes {
    fn default() -> Self {
        Self {
            like_probability: 0.5,
        }
    }
}

#[async_trait]
impl SwipeFeed for RandomSwipes {
    async fn decide(&self, _candidate: &Candidate) -> Result<bool, JudgeError> {
        Ok(rand::thread_rng().gen_bool(self.like_probability))
    }
}

/// Votes uniformly among the round's options.
pub struct RandomVote;

#[async_trait]
impl VoteChooser for RandomVote {
    async fn choose(&self, options: &[Candidate]) -> Result<CandidateId, JudgeError> {
        options
            .choose(&mut rand::thread_rng())
            .map(|c| c.id.clone())
            .ok_or_else(|| JudgeError::IoError("empty vote options".to_string()))
    }
}
