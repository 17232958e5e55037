use super::super::domain::{Listing, ScoredListing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Consumer-side narrowing of a ranked list. Every criterion is inclusive and
/// an absent categorical value means "all".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub price_range: (f64, f64),
    pub min_bedrooms: u32,
    pub distance_range_miles: (f64, f64),
    pub heating: Option<String>,
    pub energy_rating: Option<String>,
    pub property_type: Option<String>,
    pub tenure: Option<String>,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            search: None,
            price_range: (0.0, 200_000.0),
            min_bedrooms: 0,
            distance_range_miles: (0.0, 10.0),
            heating: None,
            energy_rating: None,
            property_type: None,
            tenure: None,
        }
    }
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            if !listing
                .location
                .to_lowercase()
                .contains(&query.to_lowercase())
            {
                return false;
            }
        }

        let (min_price, max_price) = self.price_range;
        if listing.price < min_price || listing.price > max_price {
            return false;
        }

        if listing.bedrooms.unwrap_or(0) < self.min_bedrooms {
            return false;
        }

        // Listings without a distance are never hidden by the distance range.
        if let Some(miles) = listing.distance_miles() {
            let (min_miles, max_miles) = self.distance_range_miles;
            if miles < min_miles || miles > max_miles {
                return false;
            }
        }

        equals_or_all(&self.heating, &listing.heating)
            && equals_or_all(&self.energy_rating, &listing.energy_rating)
            && equals_or_all(&self.property_type, &listing.property_type)
            && equals_or_all(&self.tenure, &listing.tenure)
    }

    /// Keeps matching listings in their ranked order.
    pub fn apply(&self, ranked: Vec<ScoredListing>) -> Vec<ScoredListing> {
        ranked
            .into_iter()
            .filter(|scored| self.matches(&scored.listing))
            .collect()
    }
}

fn equals_or_all(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted.as_deref() {
        None | Some("all") => true,
        Some(value) => actual.as_deref() == Some(value),
    }
}

/// Distinct categorical values available for filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub heating: Vec<String>,
    pub energy_rating: Vec<String>,
    pub property_type: Vec<String>,
    pub tenure: Vec<String>,
}

impl FacetOptions {
    pub fn from_listings(listings: &[Listing]) -> Self {
        Self {
            heating: unique_values(listings, |listing| listing.heating.as_deref()),
            energy_rating: unique_values(listings, |listing| listing.energy_rating.as_deref()),
            property_type: unique_values(listings, |listing| listing.property_type.as_deref()),
            tenure: unique_values(listings, |listing| listing.tenure.as_deref()),
        }
    }
}

fn unique_values<F>(listings: &[Listing], field: F) -> Vec<String>
where
    F: Fn(&Listing) -> Option<&str>,
{
    listings
        .iter()
        .filter_map(field)
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
