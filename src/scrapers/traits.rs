use crate::models::AdRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing-site scrapers
/// This allows easy addition of new sources in the future
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Run the full pipeline and return one record per advertisement
    async fn scrape(&self) -> Result<Vec<AdRecord>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
