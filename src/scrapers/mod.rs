pub mod redpiso;
pub mod traits;
pub mod types;

pub use redpiso::RedpisoScraper;
pub use traits::ScraperTrait;
pub use types::ScrapeConfig;
