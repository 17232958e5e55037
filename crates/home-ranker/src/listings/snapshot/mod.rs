mod geocoding;
mod mortgage;
mod parser;

pub use geocoding::GeocodingCache;

use super::domain::Listing;
use crate::config::ListingsConfig;
use chrono::NaiveDateTime;
use parser::RawListing;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read listing snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid listing snapshot CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported snapshot format '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Listings read from one scrape, ready for ranking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub listings: Vec<Listing>,
    /// Records dropped because they carried no usable price.
    pub skipped: usize,
    pub latest_scraped_at: Option<NaiveDateTime>,
}

/// Turns scraper exports into listings, attaching coordinates and monthly
/// payment estimates on the way through.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    geocoding: GeocodingCache,
    estimate_mortgage: bool,
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotLoader {
    pub fn new() -> Self {
        Self {
            geocoding: GeocodingCache::default(),
            estimate_mortgage: true,
        }
    }

    pub fn from_config(config: &ListingsConfig) -> Self {
        let geocoding = config
            .geocoding_cache_path
            .as_ref()
            .map(GeocodingCache::from_path_or_empty)
            .unwrap_or_default();

        Self {
            geocoding,
            estimate_mortgage: config.estimate_mortgage,
        }
    }

    pub fn with_geocoding_cache(mut self, cache: GeocodingCache) -> Self {
        self.geocoding = cache;
        self
    }

    /// When disabled, listings without an upstream monthly payment keep it
    /// absent and the scoring default applies.
    pub fn estimate_mortgage(mut self, enabled: bool) -> Self {
        self.estimate_mortgage = enabled;
        self
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Snapshot, SnapshotError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let snapshot = match extension.as_str() {
            "json" => self.load_json(std::fs::File::open(path)?)?,
            "csv" => self.load_csv(std::fs::File::open(path)?)?,
            _ => return Err(SnapshotError::UnsupportedFormat(path.display().to_string())),
        };

        info!(
            path = %path.display(),
            listings = snapshot.listings.len(),
            skipped = snapshot.skipped,
            "listing snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn load_json<R: Read>(&self, reader: R) -> Result<Snapshot, SnapshotError> {
        let records = parser::parse_json(reader)?;
        Ok(self.assemble(records))
    }

    pub fn load_csv<R: Read>(&self, reader: R) -> Result<Snapshot, SnapshotError> {
        let records = parser::parse_csv(reader)?;
        Ok(self.assemble(records))
    }

    fn assemble(&self, records: Vec<RawListing>) -> Snapshot {
        let mut snapshot = Snapshot::default();

        for record in records {
            match self.to_listing(record) {
                Some(listing) => {
                    if let Some(at) = listing.scraped_at {
                        snapshot.latest_scraped_at = Some(
                            snapshot
                                .latest_scraped_at
                                .map_or(at, |latest| latest.max(at)),
                        );
                    }
                    snapshot.listings.push(listing);
                }
                None => snapshot.skipped += 1,
            }
        }

        snapshot
    }

    fn to_listing(&self, record: RawListing) -> Option<Listing> {
        let price = match record.price {
            Some(price) if price >= 0.0 && price.is_finite() => price,
            other => {
                warn!(
                    property_id = %record.property_id,
                    url = %record.url,
                    price = ?other,
                    "skipping listing without a usable price"
                );
                return None;
            }
        };

        let scraped_at = record.scraped_at();
        let calculated_monthly_payment = match record.calculated_monthly_payment {
            Some(payment) => Some(payment),
            None if self.estimate_mortgage => Some(mortgage::estimate_monthly_payment(price)),
            None => None,
        };
        let coordinates = self.geocoding.lookup(&record.location);

        Some(Listing {
            property_id: record.property_id,
            url: record.url,
            location: record.location,
            price,
            calculated_monthly_payment,
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            size: record.size,
            distance_to_destination: record.distance_to_destination,
            description: record.description,
            perplexity_analysis: record.perplexity_analysis,
            perplexity_rating: record.perplexity_rating,
            tenure: record.tenure,
            heating: record.heating,
            energy_rating: record.energy_rating,
            property_type: record.property_type,
            lease_years: record.lease_years,
            scraped_at,
            coordinates,
        })
    }
}
