//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components lie within Earth coordinate ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0} {}, {:.4}\u{00B0} {}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// Default city center (Rio de Janeiro) used when every strategy misses.
pub const DEFAULT_FALLBACK: GeoCoordinate = GeoCoordinate::new(-22.9068, -43.1729);

/// Structured, possibly partial decomposition of a raw address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub street: Option<String>,
    pub number: Option<String>,
    /// Never produced by the pattern rules; filled by postal lookups and used
    /// when composing an address.
    #[serde(default)]
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code (e.g. "RJ")
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressFields {
    pub fn street_number(&self) -> Option<(&str, &str)> {
        Some((self.street.as_deref()?, self.number.as_deref()?))
    }

    pub fn city_state(&self) -> Option<(&str, &str)> {
        Some((self.city.as_deref()?, self.state.as_deref()?))
    }

    pub fn is_empty(&self) -> bool {
        self.street_number().is_none() && self.city_state().is_none() && self.postal_code.is_none()
    }
}

/// What the upstream collaborator hands the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressInput {
    Raw(String),
    Coordinate(GeoCoordinate),
    Absent,
}

impl AddressInput {
    /// Build an input from the optional pieces an event record carries.
    /// A coordinate pair wins over an address string; blank strings count as absent.
    pub fn from_parts(address: Option<&str>, coordinate: Option<GeoCoordinate>) -> Self {
        if let Some(c) = coordinate {
            return Self::Coordinate(c);
        }
        match address.map(str::trim) {
            Some(a) if !a.is_empty() => Self::Raw(a.to_string()),
            _ => Self::Absent,
        }
    }
}

/// Which step of the chain produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    FullAddress,
    PostalCode,
    CityOnly,
    /// Coordinate supplied by the caller (bypass mode)
    Direct,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullAddress => write!(f, "full-address"),
            Self::PostalCode => write!(f, "postal-code"),
            Self::CityOnly => write!(f, "city-only"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    NoMatch,
    Error,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "no-match"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The single outcome of every resolution attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ResolutionResult {
    Resolved {
        coordinate: GeoCoordinate,
        source: ResolutionSource,
    },
    Fallback {
        coordinate: GeoCoordinate,
        reason: FallbackReason,
    },
    NoMap,
}

impl ResolutionResult {
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        match self {
            Self::Resolved { coordinate, .. } | Self::Fallback { coordinate, .. } => Some(*coordinate),
            Self::NoMap => None,
        }
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn display_line(&self) -> String {
        match self {
            Self::Resolved { coordinate, source } => {
                format!("\u{1F4CD} {} (via {})", coordinate, source)
            }
            Self::Fallback { coordinate, reason } => {
                format!("\u{1F4CD} {} (approximate, {})", coordinate, reason)
            }
            Self::NoMap => "No map to display".to_string(),
        }
    }
}

/// What a total miss of the strategy chain yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissPolicy {
    #[default]
    Fallback,
    NoMap,
}

/// Provider-boundary errors. Never escape the resolver.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Provider returned HTTP {0}")]
    Status(u16),
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("Coordinate out of range: {0}, {1}")]
    OutOfRange(f64, f64),
}
