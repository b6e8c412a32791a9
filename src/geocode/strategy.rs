//! The ordered strategy list used by the resolver.

use super::types::{AddressFields, ResolutionSource};

/// One way of turning partial address fields into a provider query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    FullAddress,
    PostalCode,
    CityOnly,
}

/// Attempt order. The fixed fallback is not a strategy; the resolver applies it
/// after this list is exhausted.
pub const STRATEGY_ORDER: [Strategy; 3] = [Strategy::FullAddress, Strategy::PostalCode, Strategy::CityOnly];

impl Strategy {
    /// Build this strategy's query, or `None` when the fields it needs are absent.
    pub fn query(&self, fields: &AddressFields, country: &str) -> Option<String> {
        match self {
            Self::FullAddress => {
                let (street, number) = fields.street_number()?;
                let (city, state) = fields.city_state()?;
                Some(format!("{}, {}, {}, {}, {}", street, number, city, state, country))
            }
            Self::PostalCode => {
                let cep = fields.postal_code.as_deref()?;
                Some(format!("{}, {}", cep, country))
            }
            Self::CityOnly => {
                let (city, state) = fields.city_state()?;
                Some(format!("{}, {}, {}", city, state, country))
            }
        }
    }

    pub fn is_applicable(&self, fields: &AddressFields) -> bool {
        self.query(fields, "").is_some()
    }

    pub fn source(&self) -> ResolutionSource {
        match self {
            Self::FullAddress => ResolutionSource::FullAddress,
            Self::PostalCode => ResolutionSource::PostalCode,
            Self::CityOnly => ResolutionSource::CityOnly,
        }
    }
}
