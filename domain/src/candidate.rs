//! Candidate value objects - the options under decision.
//!
//! A [`Candidate`] is one restaurant-like option. A [`CandidateSet`] is the
//! immutable, ordered list of candidates for one decision session; every
//! participant sees the same order, which keeps tie output deterministic.

use serde::{Deserialize, Serialize};

/// Unique, opaque identifier for a candidate.
///
/// Produced by the external places lookup (e.g., a place id); the engine
/// never interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(String);

impl CandidateId {
    /// Creates a CandidateId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One option under decision.
///
/// Immutable for the lifetime of a session: created by the places lookup,
/// never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// Average rating, 0.0..=5.0
    pub rating: f32,
    /// Number of ratings behind `rating`
    pub user_ratings_total: u32,
    /// 1..=4; 0 means unknown
    pub price_level: u8,
    /// Ordered cuisine tags; the first is the primary cuisine
    pub cuisine_tags: Vec<String>,
    pub address: String,
    pub is_open_now: bool,
    pub distance_meters: f64,
}

impl Candidate {
    /// Render the price level as dollar signs ("$".."$$$$").
    ///
    /// Unknown (0) is clamped to one dollar sign.
    pub fn price_display(&self) -> String {
        "$".repeat(self.price_level.clamp(1, 4) as usize)
    }

    /// The primary cuisine tag, if any.
    pub fn primary_cuisine(&self) -> Option<&str> {
        self.cuisine_tags.first().map(String::as_str)
    }
}

/// Immutable, ordered collection of candidates for one decision round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates in their original (shared) order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look a candidate up by id.
    pub fn get(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.id == id)
    }

    /// The highest-rated candidate (ties keep the earliest in original order).
    ///
    /// Used by the solo flow when a participant liked nothing.
    pub fn top_rated(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .reduce(|best, c| if c.rating > best.rating { c } else { best })
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl From<Vec<Candidate>> for CandidateSet {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self::new(candidates)
    }
}

/// Query refinement for the places lookup.
///
/// Purely a server-side filter; it has no bearing on the resolution
/// algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Search radius in meters (default: 1609, one mile)
    pub radius_meters: u32,
    /// Cuisine keywords; empty means any
    pub cuisine: Vec<String>,
    /// Acceptable price levels, subset of 1..=4
    pub price_levels: Vec<u8>,
    /// Only candidates open right now
    pub open_now: bool,
    /// Minimum average rating
    pub min_rating: f32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            radius_meters: 1609,
            cuisine: Vec::new(),
            price_levels: vec![1, 2, 3, 4],
            open_now: false,
            min_rating: 0.0,
        }
    }
}
