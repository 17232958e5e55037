pub mod browse;
pub mod domain;
pub mod scoring;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use domain::{Coordinates, Listing, ScoreFactors, ScoredListing};
pub use scoring::{
    score, ExcludedListing, ExclusionReason, ListingVerdict, PriorityEngine, PriorityWeights,
    RankingOutcome, ScoreCard, WeightFactor,
};
pub use snapshot::{GeocodingCache, Snapshot, SnapshotError, SnapshotLoader};
