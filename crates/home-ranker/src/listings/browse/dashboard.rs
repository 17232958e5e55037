use super::super::domain::ScoredListing;
use super::super::scoring::round_to_tenth;
use super::format::WALKING_LIMIT_MILES;
use serde::Serialize;

/// Headline figures for a ranked (and usually filtered) result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub count: usize,
    pub average_price: u64,
    pub median_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_distance_miles: Option<f64>,
    pub average_score: f64,
    pub walking_distance_pct: u8,
}

impl DashboardStats {
    pub fn from_listings(listings: &[ScoredListing]) -> Self {
        let count = listings.len();
        if count == 0 {
            return Self {
                count,
                average_price: 0,
                median_price: 0.0,
                average_distance_miles: None,
                average_score: 0.0,
                walking_distance_pct: 0,
            };
        }

        let total_price: f64 = listings.iter().map(|scored| scored.listing.price).sum();
        let mut prices: Vec<f64> = listings.iter().map(|scored| scored.listing.price).collect();
        prices.sort_by(f64::total_cmp);
        let median_price = prices.get(count / 2).copied().unwrap_or_default();

        let distances: Vec<f64> = listings
            .iter()
            .filter_map(|scored| scored.listing.distance_miles())
            .collect();
        let average_distance_miles = if distances.is_empty() {
            None
        } else {
            Some(round_to_tenth(
                distances.iter().sum::<f64>() / distances.len() as f64,
            ))
        };

        let total_score: f64 = listings.iter().map(|scored| scored.priority_score).sum();

        let walking = listings
            .iter()
            .filter(|scored| {
                scored
                    .listing
                    .distance_miles()
                    .is_some_and(|miles| miles <= WALKING_LIMIT_MILES)
            })
            .count();

        Self {
            count,
            average_price: (total_price / count as f64).round() as u64,
            median_price,
            average_distance_miles,
            average_score: round_to_tenth(total_score / count as f64),
            walking_distance_pct: ((walking as f64 / count as f64) * 100.0).round() as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub label: &'static str,
    pub count: usize,
}

struct BucketBounds {
    label: &'static str,
    min: f64,
    max: f64,
}

const SCORE_ZONES: [BucketBounds; 7] = [
    BucketBounds { label: "0-20", min: 0.0, max: 20.0 },
    BucketBounds { label: "20-40", min: 20.0, max: 40.0 },
    BucketBounds { label: "40-50", min: 40.0, max: 50.0 },
    BucketBounds { label: "50-60", min: 50.0, max: 60.0 },
    BucketBounds { label: "60-70", min: 60.0, max: 70.0 },
    BucketBounds { label: "70-80", min: 70.0, max: 80.0 },
    BucketBounds { label: "80+", min: 80.0, max: f64::INFINITY },
];

const PRICE_BUCKETS: [BucketBounds; 10] = [
    BucketBounds { label: "0-50k", min: 0.0, max: 50_000.0 },
    BucketBounds { label: "50-70k", min: 50_000.0, max: 70_000.0 },
    BucketBounds { label: "70-85k", min: 70_000.0, max: 85_000.0 },
    BucketBounds { label: "85-100k", min: 85_000.0, max: 100_000.0 },
    BucketBounds { label: "100-110k", min: 100_000.0, max: 110_000.0 },
    BucketBounds { label: "110-120k", min: 110_000.0, max: 120_000.0 },
    BucketBounds { label: "120-130k", min: 120_000.0, max: 130_000.0 },
    BucketBounds { label: "130-140k", min: 130_000.0, max: 140_000.0 },
    BucketBounds { label: "140-160k", min: 140_000.0, max: 160_000.0 },
    BucketBounds { label: "160k+", min: 160_000.0, max: f64::INFINITY },
];

const DISTANCE_TIERS: [BucketBounds; 4] = [
    BucketBounds { label: "0-0.6mi", min: 0.0, max: 0.6 },
    BucketBounds { label: "0.6-1.5mi", min: 0.6, max: 1.5 },
    BucketBounds { label: "1.5-3mi", min: 1.5, max: 3.0 },
    BucketBounds { label: "3+mi", min: 3.0, max: f64::INFINITY },
];

fn histogram<I>(bounds: &[BucketBounds], values: I) -> Vec<DistributionBucket>
where
    I: Iterator<Item = f64> + Clone,
{
    bounds
        .iter()
        .map(|bucket| DistributionBucket {
            label: bucket.label,
            count: values
                .clone()
                .filter(|value| *value >= bucket.min && *value < bucket.max)
                .count(),
        })
        .collect()
}

pub fn score_distribution(listings: &[ScoredListing]) -> Vec<DistributionBucket> {
    histogram(
        &SCORE_ZONES,
        listings.iter().map(|scored| scored.priority_score),
    )
}

pub fn price_distribution(listings: &[ScoredListing]) -> Vec<DistributionBucket> {
    histogram(
        &PRICE_BUCKETS,
        listings.iter().map(|scored| scored.listing.price),
    )
}

/// Listings without a distance are left out.
pub fn distance_distribution(listings: &[ScoredListing]) -> Vec<DistributionBucket> {
    histogram(
        &DISTANCE_TIERS,
        listings
            .iter()
            .filter_map(|scored| scored.listing.distance_miles()),
    )
}

/// Everything the dashboard view renders in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub score_distribution: Vec<DistributionBucket>,
    pub price_distribution: Vec<DistributionBucket>,
    pub distance_distribution: Vec<DistributionBucket>,
}

impl DashboardSummary {
    pub fn from_listings(listings: &[ScoredListing]) -> Self {
        Self {
            stats: DashboardStats::from_listings(listings),
            score_distribution: score_distribution(listings),
            price_distribution: price_distribution(listings),
            distance_distribution: distance_distribution(listings),
        }
    }
}
