//! Places lookup port
//!
//! Defines the interface for fetching candidates from a geographic places
//! service. Purely an input boundary: the returned list becomes the immutable
//! candidate set of a session, and lookup failures surface verbatim to the
//! caller's retry decision.

use async_trait::async_trait;
use thiserror::Error;

use tablepick_domain::{Candidate, SearchFilters};

/// Errors that can occur during a places lookup
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Places service rejected the request: {0}")]
    Rejected(String),

    #[error("Quota exhausted")]
    QuotaExhausted,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Gateway to the external places service.
#[async_trait]
pub trait PlacesGateway: Send + Sync {
    /// Fetch up to `limit` candidates around a location, ordered by the
    /// service's relevance. Filters are a server-side query refinement with
    /// no bearing on the resolution algorithms.
    async fn fetch_candidates(
        &self,
        lat: f64,
        lng: f64,
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<Candidate>, PlacesError>;
}
