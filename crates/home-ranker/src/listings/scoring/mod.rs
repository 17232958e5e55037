mod rules;
mod weights;

pub use weights::{PriorityWeights, WeightFactor};

pub(crate) use rules::round_to_tenth;

use super::domain::{Listing, ScoreFactors, ScoredListing};
use rules::ResolvedInputs;
use serde::{Deserialize, Serialize};

/// Ranks listings with the given weights, dropping excluded listings.
///
/// Output is ordered by descending `priority_score`; ties keep input order.
pub fn score(listings: &[Listing], weights: &PriorityWeights) -> Vec<ScoredListing> {
    PriorityEngine::new(*weights).rank(listings)
}

/// Stateless scorer that applies a weight configuration to listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityEngine {
    weights: PriorityWeights,
}

impl PriorityEngine {
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &PriorityWeights {
        &self.weights
    }

    pub fn evaluate(&self, listing: &Listing) -> ListingVerdict {
        let inputs = ResolvedInputs::from_listing(listing);

        if let Some(reason) = rules::exclusion_for(listing, &inputs) {
            return ListingVerdict::Excluded(reason);
        }

        let factors = ScoreFactors {
            location: rules::location_score(inputs.distance_miles),
            price: rules::price_score(listing.price),
            monthly: rules::monthly_score(inputs.monthly_payment, listing.heating.as_deref()),
            quality: rules::quality_score(
                inputs.rating,
                listing.energy_rating.as_deref(),
                listing.property_type.as_deref(),
            ),
        };

        let weighted = factors.location * self.weights.location
            + factors.price * self.weights.price
            + factors.monthly * self.weights.monthly
            + factors.quality * self.weights.rating;

        ListingVerdict::Scored(ScoreCard {
            priority_score: rules::round_to_tenth(weighted),
            location_score: rules::rounded_location_score(factors.location),
            factors,
        })
    }

    pub fn rank(&self, listings: &[Listing]) -> Vec<ScoredListing> {
        self.rank_with_exclusions(listings).ranked
    }

    pub fn rank_with_exclusions(&self, listings: &[Listing]) -> RankingOutcome {
        let mut ranked = Vec::with_capacity(listings.len());
        let mut excluded = Vec::new();

        for listing in listings {
            match self.evaluate(listing) {
                ListingVerdict::Scored(card) => ranked.push(card.attach(listing.clone())),
                ListingVerdict::Excluded(reason) => excluded.push(ExcludedListing {
                    property_id: listing.property_id.clone(),
                    reason,
                }),
            }
        }

        ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

        RankingOutcome { ranked, excluded }
    }
}

/// Scores computed for a single listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub priority_score: f64,
    pub location_score: u8,
    pub factors: ScoreFactors,
}

impl ScoreCard {
    fn attach(self, listing: Listing) -> ScoredListing {
        ScoredListing {
            listing,
            priority_score: self.priority_score,
            location_score: self.location_score,
            factors: self.factors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListingVerdict {
    Scored(ScoreCard),
    Excluded(ExclusionReason),
}

/// Hard rules that remove a listing from the ranking regardless of weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    CashOffersOnly,
    ShortLease { years_remaining: u32 },
}

impl ExclusionReason {
    pub fn summary(&self) -> String {
        match self {
            ExclusionReason::CashOffersOnly => "cash offers only".to_string(),
            ExclusionReason::ShortLease { years_remaining } => {
                format!("leasehold with {years_remaining} years remaining")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedListing {
    pub property_id: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub ranked: Vec<ScoredListing>,
    pub excluded: Vec<ExcludedListing>,
}
