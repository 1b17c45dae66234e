use serde::{Deserialize, Serialize};

/// One option from the home page city selection control
#[derive(Debug, Clone, PartialEq)]
pub struct CityEntry {
    pub code: String,
    pub url: String,
}

/// Map coordinates pulled from the static-map image URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    /// Both components null, used whenever extraction fails
    pub fn unknown() -> Self {
        Self {
            latitude: None,
            longitude: None,
        }
    }
}

/// Listed price. Serializes untagged: a JSON number when the heading text
/// parsed, otherwise the cleaned text as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OfferPrice {
    Amount(f64),
    Raw(String),
}

/// Core advertisement data model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: String,
    pub offer_price: OfferPrice,
    pub city: String,
    pub coordinates: Coordinates,
    pub real_state_surface: Option<f64>,
    pub antiquity: Option<String>,
    pub publication_date: String,
    pub description: Option<String>,
    pub available_features: Vec<String>,
}
