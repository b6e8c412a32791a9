//! Geocoding providers: Nominatim over HTTP, plus an offline provider.

use super::types::{GeoCoordinate, GeocodeError};
use serde::Deserialize;
use std::time::Duration;

/// Nominatim's usage policy asks for at most one result per query here.
const RESULT_LIMIT: &str = "1";

/// A forward geocoder: query string in, zero or one candidate out.
pub trait GeocodingProvider: Send + Sync {
    /// Raw search. Errors describe why no candidate could be produced.
    fn search(&self, query: &str, country_code: &str) -> Result<Vec<GeoCoordinate>, GeocodeError>;

    /// Search that never fails: errors are logged and become zero candidates.
    fn lookup(&self, query: &str, country_code: &str) -> Vec<GeoCoordinate> {
        match self.search(query, country_code) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("geocoding '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimResult {
    fn coordinate(&self) -> Result<GeoCoordinate, GeocodeError> {
        let lat: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad lat '{}'", self.lat)))?;
        let lon: f64 = self
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad lon '{}'", self.lon)))?;
        let coord = GeoCoordinate::new(lat, lon);
        if !coord.is_valid() {
            return Err(GeocodeError::OutOfRange(lat, lon));
        }
        Ok(coord)
    }
}

/// Parse a Nominatim `format=json` body, keeping at most the first candidate.
pub fn parse_candidates(body: &str) -> Result<Vec<GeoCoordinate>, GeocodeError> {
    let results: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    match results.first() {
        Some(top) => Ok(vec![top.coordinate()?]),
        None => Ok(Vec::new()),
    }
}

/// OpenStreetMap Nominatim search endpoint.
pub struct NominatimProvider {
    agent: ureq::Agent,
    endpoint: String,
    user_agent: String,
}

impl NominatimProvider {
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl GeocodingProvider for NominatimProvider {
    fn search(&self, query: &str, country_code: &str) -> Result<Vec<GeoCoordinate>, GeocodeError> {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .set("User-Agent", &self.user_agent)
            .query("q", query)
            .query("format", "json")
            .query("limit", RESULT_LIMIT);
        if !country_code.is_empty() {
            request = request.query("countrycodes", country_code);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => GeocodeError::Status(code),
            ureq::Error::Transport(t) => GeocodeError::Network(t.to_string()),
        })?;

        let body = response
            .into_string()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        parse_candidates(&body)
    }
}

// ─── Offline provider ───────────────────────────────────────────

/// Never reaches the network; every query misses.
pub struct OfflineProvider;

impl GeocodingProvider for OfflineProvider {
    fn search(&self, _query: &str, _country_code: &str) -> Result<Vec<GeoCoordinate>, GeocodeError> {
        Ok(Vec::new())
    }
}
