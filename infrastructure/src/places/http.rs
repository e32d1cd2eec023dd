//! HTTP places gateway
//!
//! Fetches restaurant candidates from a Places-style nearby-search endpoint
//! and maps the wire records into domain candidates. Filter mapping:
//!
//! - `radius_meters` → `radius`
//! - `open_now` → `opennow` (present only when set)
//! - `price_levels` → `minprice`/`maxprice` (wire levels are zero-based,
//!   domain levels are 1..=4)
//! - `cuisine` keywords → space-joined `keyword`
//! - `min_rating` is applied client-side after the response arrives
//!
//! Distance from the query point is computed here (the service does not
//! return one) and cuisine tags are normalized from the service's `types`
//! list, dropping the generic classifications every restaurant carries.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use tablepick_application::ports::places::{PlacesError, PlacesGateway};
use tablepick_domain::{Candidate, CandidateId, SearchFilters};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Type tags present on essentially every result; carrying them as cuisine
/// would make every candidate look the same.
const GENERIC_TYPES: &[&str] = &["restaurant", "food", "point_of_interest", "establishment"];

const MAX_CUISINE_TAGS: usize = 3;

/// Places gateway backed by an HTTP nearby-search API.
pub struct HttpPlacesGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpPlacesGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the gateway at a different endpoint (local stubs, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PlacesGateway for HttpPlacesGateway {
    async fn fetch_candidates(
        &self,
        lat: f64,
        lng: f64,
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<Candidate>, PlacesError> {
        let mut query = build_query(lat, lng, filters);
        query.push(("key".to_string(), self.api_key.clone()));

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| PlacesError::Transport(e.to_string()))?;

        let body: NearbyResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::MalformedResponse(e.to_string()))?;

        check_status(&body.status, body.error_message.as_deref())?;
        debug!(results = body.results.len(), "Places lookup returned");

        let mut candidates: Vec<Candidate> = body
            .results
            .into_iter()
            .filter_map(|place| match map_place(place, lat, lng) {
                Ok(candidate) => Some(candidate),
                Err(field) => {
                    warn!(missing = field, "Skipping place record with missing field");
                    None
                }
            })
            .filter(|c| c.rating >= filters.min_rating)
            .collect();
        candidates.truncate(limit);
        Ok(candidates)
    }
}

/// Build the query string pairs for one lookup (API key excluded).
fn build_query(lat: f64, lng: f64, filters: &SearchFilters) -> Vec<(String, String)> {
    let mut query = vec![
        ("location".to_string(), format!("{lat},{lng}")),
        ("radius".to_string(), filters.radius_meters.to_string()),
        ("type".to_string(), "restaurant".to_string()),
    ];
    if filters.open_now {
        query.push(("opennow".to_string(), "true".to_string()));
    }
    if !filters.cuisine.is_empty() {
        query.push(("keyword".to_string(), filters.cuisine.join(" ")));
    }
    // Wire price levels are zero-based
    if let (Some(min), Some(max)) = (
        filters.price_levels.iter().min(),
        filters.price_levels.iter().max(),
    ) {
        query.push(("minprice".to_string(), min.saturating_sub(1).to_string()));
        query.push(("maxprice".to_string(), max.saturating_sub(1).to_string()));
    }
    query
}

fn check_status(status: &str, error_message: Option<&str>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(PlacesError::QuotaExhausted),
        other => Err(PlacesError::Rejected(format!(
            "{other}: {}",
            error_message.unwrap_or("no detail")
        ))),
    }
}

/// Map one wire record into a candidate; `Err` names the missing field.
fn map_place(place: RawPlace, lat: f64, lng: f64) -> Result<Candidate, &'static str> {
    let id = place.place_id.ok_or("place_id")?;
    let name = place.name.ok_or("name")?;
    let location = place.geometry.map(|g| g.location);

    let distance_meters = location
        .map(|loc| haversine_meters(lat, lng, loc.lat, loc.lng))
        .unwrap_or(0.0);

    Ok(Candidate {
        id: CandidateId::new(id),
        name,
        rating: place.rating,
        user_ratings_total: place.user_ratings_total,
        price_level: place.price_level,
        cuisine_tags: normalize_cuisine(&place.types),
        address: place.vicinity.unwrap_or_default(),
        is_open_now: place.opening_hours.is_some_and(|h| h.open_now),
        distance_meters,
    })
}

/// Turn the service's `types` list into display-ready cuisine tags: drop the
/// generic classifications, humanize underscores, keep the leading few.
fn normalize_cuisine(types: &[String]) -> Vec<String> {
    types
        .iter()
        .filter(|t| !GENERIC_TYPES.contains(&t.as_str()))
        .map(|t| t.replace('_', " "))
        .take(MAX_CUISINE_TAGS)
        .collect()
}

/// Great-circle distance between two coordinates, in meters.
fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

// ==================== Wire types ====================

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    user_ratings_total: u32,
    #[serde(default)]
    price_level: u8,
    #[serde(default)]
    types: Vec<String>,
    vicinity: Option<String>,
    opening_hours: Option<RawOpeningHours>,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawOpeningHours {
    #[serde(default)]
    open_now: bool,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct RawGeometry {
    location: RawLocation,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct RawLocation {
    lat: f64,
    lng: f64,
}
