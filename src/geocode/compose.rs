//! Address composition: the inverse of extraction.
//!
//! Builds the single-line form
//! `"<street>, <number>[, <complement>][, <neighborhood>], <city> - <UF>, CEP <cep>"`
//! that the pattern rules in [`super::extract`] read back.

use super::types::AddressFields;

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Compose a display address. Street and number are required; every other
/// segment is left out when missing or blank.
pub fn compose_address(fields: &AddressFields, complement: Option<&str>) -> Option<String> {
    let street = present(fields.street.as_deref())?;
    let number = present(fields.number.as_deref())?;

    let mut out = format!("{}, {}", street, number);
    for part in [present(complement), present(fields.neighborhood.as_deref())]
        .into_iter()
        .flatten()
    {
        out.push_str(", ");
        out.push_str(part);
    }

    match (present(fields.city.as_deref()), present(fields.state.as_deref())) {
        (Some(city), Some(state)) => out.push_str(&format!(", {} - {}", city, state)),
        (Some(city), None) => out.push_str(&format!(", {}", city)),
        _ => {}
    }

    if let Some(cep) = present(fields.postal_code.as_deref()) {
        out.push_str(&format!(", CEP {}", cep));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::extract::extract_fields;

    fn sample() -> AddressFields {
        AddressFields {
            street: Some("Rua das Flores".into()),
            number: Some("123".into()),
            neighborhood: Some("Centro".into()),
            city: Some("Rio de Janeiro".into()),
            state: Some("RJ".into()),
            postal_code: Some("20000-000".into()),
        }
    }

    #[test]
    fn test_full_composition() {
        assert_eq!(
            compose_address(&sample(), Some("Apto 4")).as_deref(),
            Some("Rua das Flores, 123, Apto 4, Centro, Rio de Janeiro - RJ, CEP 20000-000")
        );
    }

    #[test]
    fn test_blank_segments_are_skipped() {
        let fields = AddressFields { neighborhood: Some("  ".into()), ..sample() };
        assert_eq!(
            compose_address(&fields, Some("")).as_deref(),
            Some("Rua das Flores, 123, Rio de Janeiro - RJ, CEP 20000-000")
        );
    }

    #[test]
    fn test_requires_street_and_number() {
        assert_eq!(compose_address(&AddressFields { number: None, ..sample() }, None), None);
        assert_eq!(compose_address(&AddressFields { street: Some(" ".into()), ..sample() }, None), None);
        assert_eq!(compose_address(&AddressFields::default(), Some("Apto 4")), None);
    }

    #[test]
    fn test_composed_line_reads_back() {
        let fields = sample();
        let line = compose_address(&fields, Some("Bloco B")).unwrap();
        let back = extract_fields(&line);

        assert_eq!(back.street_number(), fields.street_number());
        assert_eq!(back.city_state(), fields.city_state());
        assert_eq!(back.postal_code, fields.postal_code);
        assert_eq!(back.neighborhood, None);
    }

    #[test]
    fn test_read_back_without_optional_segments() {
        let fields = AddressFields { neighborhood: None, postal_code: None, ..sample() };
        let back = extract_fields(&compose_address(&fields, None).unwrap());
        assert_eq!(back.street_number(), Some(("Rua das Flores", "123")));
        assert_eq!(back.city_state(), Some(("Rio de Janeiro", "RJ")));
        assert_eq!(back.postal_code, None);
    }
}
