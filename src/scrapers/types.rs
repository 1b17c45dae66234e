use serde::{Deserialize, Serialize};

/// Run parameters for a scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Home page URL, trailing slash included
    pub base_url: String,
    /// Path of the final JSON document
    pub output_path: String,
    /// Upper bound on listing pages fetched per city; `None` walks until an
    /// empty page comes back
    pub max_pages: Option<u32>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.redpiso.es/".to_string(),
            output_path: "data.json".to_string(),
            max_pages: None,
        }
    }
}
