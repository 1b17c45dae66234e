use piso_scout::models::OfferPrice;
use piso_scout::outputs;
use piso_scout::scrapers::{RedpisoScraper, ScraperTrait};
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Piso Scout - Redpiso Scraper");
    info!("================================");
    info!("");

    let scraper = RedpisoScraper::new()?;

    info!("Starting sequential scrape of every city...");
    info!("This will visit each advertisement page for detailed information");
    info!("");

    let records = scraper.scrape().await?;

    // Display results
    info!("\n✅ Scraped {} ads\n", records.len());

    for (i, record) in records.iter().enumerate() {
        match &record.offer_price {
            OfferPrice::Amount(amount) => println!("{}. REF {} ({} €)", i + 1, record.id, amount),
            OfferPrice::Raw(raw) => println!("{}. REF {} ({})", i + 1, record.id, raw),
        }
        println!("   City: {}", record.city);
        if let Some(surface) = record.real_state_surface {
            println!("   {} m2", surface);
        }
        println!("   Published: {}", record.publication_date);
        println!("   Features: {}", record.available_features.join(", "));
        println!();
    }

    // Save to the single JSON document
    let output_path = scraper.config().output_path.clone();
    outputs::json::write(&output_path, &records).await?;
    info!("💾 Saved all records to {}", output_path);

    Ok(())
}
