//! Address pattern extraction.
//!
//! Three independent rules pull pieces out of a composed address such as
//! `"Rua das Flores, 123, Apto 4, Centro, Rio de Janeiro - RJ, CEP 20000-000"`.
//! Each rule may miss on its own; a miss is an ordinary outcome, not an error.

use super::types::AddressFields;
use regex::Regex;
use std::sync::LazyLock;

static STREET_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^,]+?)\s*,\s*(\d+)\s*(?:,|$)").expect("valid street regex"));

static CITY_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([^,]+?)\s*-\s*([A-Z]{2})\b").expect("valid city regex"));

static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCEP:?\s*(\d{5}-?\d{3})\b").expect("valid postal regex"));

/// Leading `"<street>, <digits>"` → (street, number). The digits must form the
/// whole comma-delimited token.
pub fn extract_street_number(raw: &str) -> Option<(String, String)> {
    let caps = STREET_NUMBER.captures(raw)?;
    let street = caps.get(1)?.as_str().trim();
    if street.is_empty() {
        return None;
    }
    Some((street.to_string(), caps.get(2)?.as_str().to_string()))
}

/// `", <city> - <UF>"` anywhere in the string → (city, state code).
pub fn extract_city_state(raw: &str) -> Option<(String, String)> {
    let caps = CITY_STATE.captures(raw)?;
    let city = caps.get(1)?.as_str().trim();
    if city.is_empty() {
        return None;
    }
    Some((city.to_string(), caps.get(2)?.as_str().to_string()))
}

/// `CEP 20000-000` (case-insensitive, dash optional) → postal code as written.
pub fn extract_postal_code(raw: &str) -> Option<String> {
    POSTAL_CODE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Apply every rule and merge whatever matched.
pub fn extract_fields(raw: &str) -> AddressFields {
    let (street, number) = extract_street_number(raw).unzip();
    let (city, state) = extract_city_state(raw).unzip();
    AddressFields {
        street,
        number,
        neighborhood: None,
        city,
        state,
        postal_code: extract_postal_code(raw),
    }
}
