//! Address geocoding subsystem.
//!
//! Pattern extraction over composed addresses, an ordered strategy chain
//! against a geocoding provider, and a per-map result lifecycle that always
//! ends in a coordinate, a fallback point, or an explicit "no map".
//! Postal lookup and composition build the address line in the first place.

pub mod compose;
pub mod display;
pub mod extract;
pub mod postal;
pub mod providers;
pub mod resolver;
pub mod strategy;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use compose::compose_address;
pub use display::{AddressDisplay, DisplayState, MapView, Ticket};
pub use extract::extract_fields;
pub use postal::{normalize_cep, PostalError, PostalLookup};
pub use providers::{GeocodingProvider, NominatimProvider, OfflineProvider};
pub use resolver::{AddressResolver, Attempt, AttemptOutcome, Resolution};
pub use types::{
    AddressFields, AddressInput, FallbackReason, GeoCoordinate, GeocodeError, MissPolicy, ResolutionResult,
    ResolutionSource, DEFAULT_FALLBACK,
};
