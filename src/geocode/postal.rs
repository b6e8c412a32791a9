//! Postal code (CEP) lookup against ViaCEP.
//!
//! Turns an 8-digit CEP into street, neighborhood, city and state so a caller
//! only has to add the house number before composing an address.

use super::types::{AddressFields, GeocodeError};
use serde::Deserialize;
use std::time::Duration;

const CEP_DIGITS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PostalError {
    #[error("CEP must have 8 digits (got {0})")]
    Incomplete(usize),
    #[error("CEP {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Provider(#[from] GeocodeError),
}

/// Strip everything but digits; exactly eight must remain.
pub fn normalize_cep(input: &str) -> Result<String, PostalError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != CEP_DIGITS {
        return Err(PostalError::Incomplete(digits.len()));
    }
    Ok(digits)
}

/// `"20000000"` → `"20000-000"`, the form the extractor's CEP rule reads.
pub fn format_cep(digits: &str) -> String {
    match digits.split_at_checked(5) {
        Some((head, tail)) => format!("{}-{}", head, tail),
        None => digits.to_string(),
    }
}

#[derive(Deserialize, Debug)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    /// `true` (or `"true"` on older deployments) when the CEP is unknown
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a ViaCEP `/json/` body. `Ok(None)` means the service has no such CEP.
pub fn parse_postal_body(body: &str, digits: &str) -> Result<Option<AddressFields>, GeocodeError> {
    let resp: ViaCepResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    match resp.erro {
        Some(serde_json::Value::Bool(false)) | None => {}
        Some(_) => return Ok(None),
    }

    Ok(Some(AddressFields {
        street: non_blank(resp.logradouro),
        number: None,
        neighborhood: non_blank(resp.bairro),
        city: non_blank(resp.localidade),
        state: non_blank(resp.uf),
        postal_code: Some(format_cep(digits)),
    }))
}

/// ViaCEP client: `GET {base}/{cep}/json/`.
pub struct PostalLookup {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
}

impl PostalLookup {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        }
    }

    /// Look up a CEP as typed by a user (punctuation allowed).
    pub fn lookup(&self, cep: &str) -> Result<AddressFields, PostalError> {
        let digits = normalize_cep(cep)?;
        let url = format!("{}/{}/json/", self.base_url, digits);
        log::debug!("postal lookup {}", url);

        let response = self
            .agent
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => GeocodeError::Status(code),
                ureq::Error::Transport(t) => GeocodeError::Network(t.to_string()),
            })?;
        let body = response
            .into_string()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        parse_postal_body(&body, &digits)?.ok_or_else(|| PostalError::NotFound(format_cep(&digits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::testing::StubServer;

    const SE: &str = r#"{
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308"
    }"#;

    #[test]
    fn test_normalize_cep() {
        assert_eq!(normalize_cep("01001-000").unwrap(), "01001000");
        assert_eq!(normalize_cep(" 01.001-000 ").unwrap(), "01001000");
        assert!(matches!(normalize_cep("0100"), Err(PostalError::Incomplete(4))));
        assert!(matches!(normalize_cep(""), Err(PostalError::Incomplete(0))));
        assert!(matches!(normalize_cep("010010001"), Err(PostalError::Incomplete(9))));
    }

    #[test]
    fn test_format_cep() {
        assert_eq!(format_cep("01001000"), "01001-000");
    }

    #[test]
    fn test_parse_found() {
        let f = parse_postal_body(SE, "01001000").unwrap().unwrap();
        assert_eq!(f.street.as_deref(), Some("Praça da Sé"));
        assert_eq!(f.neighborhood.as_deref(), Some("Sé"));
        assert_eq!(f.city_state(), Some(("São Paulo", "SP")));
        assert_eq!(f.postal_code.as_deref(), Some("01001-000"));
        assert_eq!(f.number, None);
    }

    #[test]
    fn test_parse_not_found_flag() {
        assert_eq!(parse_postal_body(r#"{"erro": true}"#, "99999999").unwrap(), None);
        assert_eq!(parse_postal_body(r#"{"erro": "true"}"#, "99999999").unwrap(), None);
    }

    #[test]
    fn test_parse_blank_street() {
        // Single-CEP towns have no street.
        let body = r#"{"cep":"28300-000","logradouro":"","bairro":"","localidade":"Itaperuna","uf":"RJ"}"#;
        let f = parse_postal_body(body, "28300000").unwrap().unwrap();
        assert_eq!(f.street, None);
        assert_eq!(f.neighborhood, None);
        assert_eq!(f.city_state(), Some(("Itaperuna", "RJ")));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_postal_body("<html>", "01001000"), Err(GeocodeError::InvalidResponse(_))));
    }

    #[test]
    fn test_lookup_against_local_server() {
        let server = StubServer::start(200, SE);
        let client = PostalLookup::new(format!("{}/ws/", server.base_url), "rsvp-geo-test/0.3", Duration::from_secs(5));

        let f = client.lookup("01001-000").unwrap();
        assert_eq!(f.street.as_deref(), Some("Praça da Sé"));

        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "/ws/01001000/json/");
        assert_eq!(seen[0].user_agent.as_deref(), Some("rsvp-geo-test/0.3"));
    }

    #[test]
    fn test_lookup_not_found_and_bad_input() {
        let server = StubServer::start(200, r#"{"erro": true}"#);
        let client = PostalLookup::new(format!("{}/ws", server.base_url), "t", Duration::from_secs(5));

        assert!(matches!(client.lookup("99999-999"), Err(PostalError::NotFound(cep)) if cep == "99999-999"));
        assert!(matches!(client.lookup("123"), Err(PostalError::Incomplete(3))));
        // Bad input never reaches the network.
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn test_lookup_status_error() {
        let server = StubServer::start(400, "bad request");
        let client = PostalLookup::new(server.base_url.clone(), "t", Duration::from_secs(5));
        assert!(matches!(
            client.lookup("01001000"),
            Err(PostalError::Provider(GeocodeError::Status(400)))
        ));
    }
}
