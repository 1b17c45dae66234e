use crate::models::{AdRecord, CityEntry, Coordinates, OfferPrice};
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::ScrapeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Selectors tied to the redpiso.es markup. Everything site-specific lives
/// in this table.
mod selectors {
    /// Home page control listing every city
    pub const CITY_SELECT: &str = "select#prv";
    /// Advertisement links on a listing-index page
    pub const AD_LINK: &str = "a.item-link";
    /// Reference block carrying the ad id
    pub const REFERENCE: &str = "div.property-reference p";
    /// Contact block heading carrying the price
    pub const PRICE: &str = "div.property-contact-item h2";
    /// Static-map image; its `src` carries the coordinates
    pub const MAP_IMAGE: &str = "img.img-property-map";
    /// One block per property attribute
    pub const FEATURE_ITEM: &str = "div.col-lg-3.col-md-4.col-sm-6.property-features-item";
    /// Visit counter and publication date pair; index 1 is the date
    pub const VISITS: &str = "span.property-visits";
    /// Content column holding the free-text description
    pub const DESCRIPTION: &str = "div.col-md-6 p";
}

/// Listing-index path segment appended to the base URL per city
const LISTING_PATH: &str = "venta-viviendas";
/// URL segment marking a paginated listing page
const PAGE_MARKER: &str = "pagina";
/// Literal prefix in front of the ad reference
const REFERENCE_PREFIX: &str = "REF: ";
/// Query fragment in the static-map URL that precedes the coordinates
const COORDS_MARKER: &str = "center=";
/// Widest `lat,lng` pair the map URL carries after the marker
const COORDS_WIDTH: usize = 19;
/// Feature block marker for the built surface
const SURFACE_MARKER: &str = "Metros:";
/// Feature block marker for the construction year
const ANTIQUITY_MARKER: &str = "Año de";

/// Redpiso scraper implementation
pub struct RedpisoScraper {
    client: Client,
    config: ScrapeConfig,
}

impl RedpisoScraper {
    /// Create a new Redpiso scraper against the production site
    pub fn new() -> Result<Self> {
        Self::with_config(ScrapeConfig::default())
    }

    /// Create a new Redpiso scraper with custom run parameters
    pub fn with_config(config: ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// One session for the whole run; status is not checked, an off-range
    /// listing page simply parses to zero links.
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        debug!("Downloaded {} bytes of HTML", body.len());
        Ok(body)
    }

    /// Discover every city listed in the home page selection control
    pub async fn discover_cities(&self) -> Result<Vec<CityEntry>> {
        let html = self.fetch(&self.config.base_url).await?;
        let cities = parse_city_options(&html, &self.config.base_url)?;
        info!("Discovered {} cities", cities.len());
        Ok(cities)
    }

    /// Walk a city's listing pages, accumulating every advertisement URL.
    /// Stops at the first page that yields no links, or at the configured
    /// page cap.
    pub async fn collect_ad_urls(&self, city: &CityEntry) -> Result<Vec<String>> {
        let mut ad_urls = Vec::new();
        let mut page_url = city.url.clone();
        let mut pages_fetched = 0u32;

        loop {
            if let Some(cap) = self.config.max_pages {
                if pages_fetched >= cap {
                    debug!(city = %city.code, cap, "Page cap reached");
                    break;
                }
            }

            let html = self.fetch(&page_url).await?;
            let links = parse_ad_links(&html);
            pages_fetched += 1;

            if links.is_empty() {
                break;
            }

            ad_urls.extend(links);
            debug!(city = %city.code, count = ad_urls.len(), "Accumulated ad links");

            page_url = next_listing_url(&page_url)?;
        }

        Ok(ad_urls)
    }

    /// Fetch one advertisement page and extract its record
    pub async fn scrape_ad(&self, url: &str, city: &str) -> Result<AdRecord> {
        let html = self.fetch(url).await?;
        parse_ad_page(&html, city).with_context(|| format!("Failed to parse ad page {}", url))
    }
}

#[async_trait]
impl ScraperTrait for RedpisoScraper {
    async fn scrape(&self) -> Result<Vec<AdRecord>> {
        info!("Starting Redpiso scrape from {}", self.config.base_url);

        let cities = self.discover_cities().await?;

        info!("Getting all ad URLs...");
        let mut city_ads: Vec<(CityEntry, Vec<String>)> = Vec::new();
        for city in cities {
            info!("City: {}", city.code);
            let urls = self.collect_ad_urls(&city).await?;
            info!("Found {} ads in {}", urls.len(), city.code);
            city_ads.push((city, urls));
        }

        info!("Getting all ads...");
        let mut records = Vec::new();
        for (city, urls) in &city_ads {
            info!("Scraping city {}, with {} total ads", city.code, urls.len());
            for url in urls {
                let record = self.scrape_ad(url, &city.code).await?;
                records.push(record);
            }
        }

        info!("Scraped {} records", records.len());
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "Redpiso"
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Parse the home page city control into entries in document order.
/// Errors when the control itself is absent.
fn parse_city_options(html: &str, base_url: &str) -> Result<Vec<CityEntry>> {
    let document = Html::parse_document(html);
    let select_selector = Selector::parse(selectors::CITY_SELECT).unwrap();
    let option_selector = Selector::parse("option").unwrap();

    let control = document
        .select(&select_selector)
        .next()
        .context("City selection control not found on home page")?;

    let mut cities = Vec::new();
    for option in control.select(&option_selector) {
        let code = option
            .value()
            .attr("value")
            .context("City option is missing its value attribute")?;

        cities.push(CityEntry {
            code: code.to_string(),
            url: format!("{}{}/{}", base_url, LISTING_PATH, code),
        });
    }

    Ok(cities)
}

/// Extract every advertisement link on a listing page, in document order
fn parse_ad_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse(selectors::AD_LINK).unwrap();

    document
        .select(&link_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Advance a listing URL to the next page: increment a trailing `pagina-N`
/// token, or start the pagination suffix at page 2.
fn next_listing_url(url: &str) -> Result<String> {
    if url.contains(PAGE_MARKER) {
        let (head, tail) = url
            .rsplit_once('-')
            .with_context(|| format!("Paginated URL has no page token: {}", url))?;
        let page: u32 = tail
            .parse()
            .with_context(|| format!("Page token is not numeric: {}", url))?;
        Ok(format!("{}-{}", head, page + 1))
    } else {
        Ok(format!("{}/{}-2", url, PAGE_MARKER))
    }
}

/// Extract one advertisement record from its detail page
fn parse_ad_page(html: &str, city: &str) -> Result<AdRecord> {
    let document = Html::parse_document(html);

    let reference_selector = Selector::parse(selectors::REFERENCE).unwrap();
    let reference = document
        .select(&reference_selector)
        .next()
        .context("Reference block not found")?;
    let id = element_text(&reference).replace(REFERENCE_PREFIX, "");

    let price_selector = Selector::parse(selectors::PRICE).unwrap();
    let price_heading = document
        .select(&price_selector)
        .next()
        .context("Price heading not found")?;
    let offer_price = parse_price(&element_text(&price_heading));

    let map_selector = Selector::parse(selectors::MAP_IMAGE).unwrap();
    let coordinates = document
        .select(&map_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(parse_map_coordinates)
        .unwrap_or_else(Coordinates::unknown);

    let feature_selector = Selector::parse(selectors::FEATURE_ITEM).unwrap();
    let mut real_state_surface = None;
    let mut antiquity = None;
    let mut available_features = Vec::new();

    for item in document.select(&feature_selector) {
        let text = element_text(&item);
        if text.contains(SURFACE_MARKER) {
            let surface = parse_surface(&text)
                .with_context(|| format!("Malformed surface block: {:?}", text.trim()))?;
            real_state_surface = Some(surface);
        } else if text.contains(ANTIQUITY_MARKER) {
            antiquity = Some(parse_antiquity(&text));
        } else {
            available_features.push(text.replace('\n', "").trim().to_string());
        }
    }

    let visits_selector = Selector::parse(selectors::VISITS).unwrap();
    let date_span = document
        .select(&visits_selector)
        .nth(1)
        .context("Publication date span not found")?;
    let publication_date = element_text(&date_span).trim().to_string();

    let description_selector = Selector::parse(selectors::DESCRIPTION).unwrap();
    let description = document
        .select(&description_selector)
        .next()
        .map(|p| element_text(&p));

    Ok(AdRecord {
        id,
        offer_price,
        city: city.to_string(),
        coordinates,
        real_state_surface,
        antiquity,
        publication_date,
        description,
        available_features,
    })
}

/// Strip the currency suffix and thousands separators; keep the cleaned
/// text when the remainder is not a number.
fn parse_price(raw: &str) -> OfferPrice {
    let cleaned = raw.trim().replace(" €", "").replace('.', "");
    match cleaned.parse::<f64>() {
        Ok(amount) => OfferPrice::Amount(amount),
        Err(_) => OfferPrice::Raw(cleaned),
    }
}

/// Pull `lat,lng` out of a static-map URL. The pair sits after `center=`,
/// at most [`COORDS_WIDTH`] characters wide, terminated by `&`.
fn parse_map_coordinates(src: &str) -> Option<Coordinates> {
    let start = src.find(COORDS_MARKER)? + COORDS_MARKER.len();
    let tail = &src[start..];
    let window = tail.get(..COORDS_WIDTH).unwrap_or(tail);
    let pair = window.split('&').next()?;
    let (lat, lng) = pair.split_once(',')?;

    Some(Coordinates {
        latitude: Some(lat.parse().ok()?),
        longitude: Some(lng.parse().ok()?),
    })
}

/// `Metros: 85 m2` carries the built surface in square meters
fn parse_surface(text: &str) -> Option<f64> {
    let rest = text.split(SURFACE_MARKER).nth(1)?.trim();
    let rest = rest
        .strip_suffix("m2")
        .or_else(|| rest.strip_suffix("m²"))
        .unwrap_or(rest);
    rest.trim().parse().ok()
}

/// `Año de construcción: 1998` carries the construction year in its last
/// four characters once trimmed
fn parse_antiquity(text: &str) -> String {
    let trimmed = text.trim();
    let cut = trimmed
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| i)
        .unwrap_or(0);
    trimmed[cut..].to_string()
}
