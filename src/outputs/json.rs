//! JSON document output.
//!
//! The whole run serializes to one UTF-8 document: an ordered array of
//! records, 4-space indent, non-ASCII characters kept literal. Written once,
//! at process completion.

use crate::models::AdRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::fs;
use tracing::info;

/// Render the record array as the final document text
pub fn render(records: &[AdRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize records")?;

    String::from_utf8(buf).context("Serialized document is not UTF-8")
}

/// Write the document to `path`
pub async fn write(path: &str, records: &[AdRecord]) -> Result<()> {
    let document = render(records)?;
    fs::write(path, document)
        .await
        .with_context(|| format!("Failed to write {}", path))?;

    info!(path = %path, count = records.len(), "Wrote JSON document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, OfferPrice};

    fn sample() -> AdRecord {
        AdRecord {
            id: "RP-7".to_string(),
            offer_price: OfferPrice::Amount(95_000.0),
            city: "avila".to_string(),
            coordinates: Coordinates::unknown(),
            real_state_surface: None,
            antiquity: None,
            publication_date: "01/02/2021".to_string(),
            description: Some("Ático en Ávila".to_string()),
            available_features: vec!["Garaje".to_string()],
        }
    }

    #[test]
    fn renders_four_space_indented_array() {
        let document = render(&[sample()]).unwrap();

        assert!(document.starts_with('['));
        assert!(document.contains("\n    {"));
        assert!(document.contains("\n        \"id\": \"RP-7\""));
    }

    #[test]
    fn keeps_non_ascii_literal() {
        let document = render(&[sample()]).unwrap();
        assert!(document.contains("Ático en Ávila"));
    }

    #[test]
    fn degraded_price_serializes_as_string() {
        let mut record = sample();
        record.offer_price = OfferPrice::Raw("Consultar".to_string());

        let document = render(&[record]).unwrap();
        assert!(document.contains("\"offer_price\": \"Consultar\""));

        let document = render(&[sample()]).unwrap();
        assert!(document.contains("\"offer_price\": 95000.0"));
    }

    #[test]
    fn null_coordinates_serialize_as_nulls() {
        let document = render(&[sample()]).unwrap();
        assert!(document.contains("\"latitude\": null"));
        assert!(document.contains("\"longitude\": null"));
    }
}
