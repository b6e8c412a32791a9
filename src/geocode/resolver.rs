//! Address resolver — orchestrates the strategy chain.
//!
//! Raw flow:   extract fields → full address → postal code → city only → miss policy
//! Direct:     caller's coordinate, verbatim (provider never called)
//! Absent:     no map

use super::extract::extract_fields;
use super::providers::{GeocodingProvider, NominatimProvider, OfflineProvider};
use super::strategy::STRATEGY_ORDER;
use super::types::{
    AddressFields, AddressInput, FallbackReason, GeoCoordinate, MissPolicy, ResolutionResult,
    ResolutionSource,
};
use crate::config::ResolverConfig;
use serde::Serialize;

/// What happened when one strategy was tried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum AttemptOutcome {
    Hit { coordinate: GeoCoordinate },
    Miss,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub strategy: ResolutionSource,
    pub query: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// A result plus the trail that led to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub result: ResolutionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<AddressFields>,
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    fn bare(result: ResolutionResult) -> Self {
        Self { result, fields: None, attempts: Vec::new() }
    }
}

/// The resolver: a provider plus the policy knobs from [`ResolverConfig`].
pub struct AddressResolver {
    provider: Box<dyn GeocodingProvider>,
    config: ResolverConfig,
}

impl AddressResolver {
    pub fn new(provider: impl GeocodingProvider + 'static, config: ResolverConfig) -> Self {
        Self { provider: Box::new(provider), config }
    }

    /// Resolver backed by Nominatim, or by the offline provider when `offline` is set.
    pub fn from_config(config: ResolverConfig, offline: bool) -> Self {
        if offline {
            return Self::new(OfflineProvider, config);
        }
        let provider = NominatimProvider::new(config.endpoint.clone(), config.user_agent.clone(), config.timeout());
        Self::new(provider, config)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve any input form. Never fails.
    pub fn resolve(&self, input: &AddressInput) -> ResolutionResult {
        self.resolve_explained(input).result
    }

    /// Resolve and keep the attempt trail.
    pub fn resolve_explained(&self, input: &AddressInput) -> Resolution {
        match input {
            AddressInput::Coordinate(c) if c.is_valid() => Resolution::bare(ResolutionResult::Resolved {
                coordinate: *c,
                source: ResolutionSource::Direct,
            }),
            AddressInput::Coordinate(c) => {
                log::warn!("ignoring out-of-range coordinate {}, {}", c.lat, c.lon);
                Resolution::bare(ResolutionResult::NoMap)
            }
            AddressInput::Raw(raw) if !raw.trim().is_empty() => self.resolve_address(raw),
            AddressInput::Raw(_) | AddressInput::Absent => Resolution::bare(ResolutionResult::NoMap),
        }
    }

    /// Run the strategy chain over a raw address string.
    pub fn resolve_address(&self, raw: &str) -> Resolution {
        let fields = extract_fields(raw);
        let mut attempts = Vec::new();

        for strategy in STRATEGY_ORDER {
            let Some(query) = strategy.query(&fields, &self.config.country_name) else {
                log::debug!("skipping {} for '{}'", strategy.source(), raw);
                continue;
            };
            log::debug!("trying {}: '{}'", strategy.source(), query);

            // Provider errors are logged inside `lookup` and arrive here as zero candidates.
            let hit = self.provider.lookup(&query, &self.config.country_code).first().copied();
            let outcome = match hit {
                Some(coordinate) => AttemptOutcome::Hit { coordinate },
                None => AttemptOutcome::Miss,
            };
            attempts.push(Attempt { strategy: strategy.source(), query, outcome });

            if let Some(coordinate) = hit {
                return Resolution {
                    result: ResolutionResult::Resolved { coordinate, source: strategy.source() },
                    fields: Some(fields),
                    attempts,
                };
            }
        }

        let result = self.on_miss();
        log::info!("no strategy matched '{}' ({} attempted)", raw, attempts.len());
        Resolution { result, fields: Some(fields), attempts }
    }

    fn on_miss(&self) -> ResolutionResult {
        match self.config.miss_policy {
            MissPolicy::NoMap => ResolutionResult::NoMap,
            MissPolicy::Fallback => ResolutionResult::Fallback {
                coordinate: self.config.fallback,
                reason: FallbackReason::NoMatch,
            },
        }
    }

    /// Fallback for a resolution that could not run to completion at all.
    pub fn failed(&self) -> ResolutionResult {
        match self.config.miss_policy {
            MissPolicy::NoMap => ResolutionResult::NoMap,
            MissPolicy::Fallback => ResolutionResult::Fallback {
                coordinate: self.config.fallback,
                reason: FallbackReason::Error,
            },
        }
    }
}
