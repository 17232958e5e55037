use crate::listings::domain::{Listing, ScoredListing};
use crate::listings::scoring::{PriorityEngine, PriorityWeights};

/// Converts miles to the kilometre distance the listings carry.
pub(super) fn km_for_miles(miles: f64) -> f64 {
    miles / crate::listings::domain::MILES_PER_KM
}

/// A well-described, walkable freehold that trips no kill switch.
pub(super) fn terrace_house(property_id: &str) -> Listing {
    let mut listing = Listing::new(property_id, 100_000.0);
    listing.url = format!("https://listings.example/{property_id}");
    listing.location = "14 Ormeau Road, Belfast".to_string();
    listing.calculated_monthly_payment = Some(500.0);
    listing.bedrooms = Some(3);
    listing.bathrooms = Some(1);
    listing.distance_to_destination = Some(0.5);
    listing.description = Some("Bright mid-terrace close to the park.".to_string());
    listing.perplexity_rating = Some(8.0);
    listing.tenure = Some("Freehold".to_string());
    listing.heating = Some("Gas".to_string());
    listing.energy_rating = Some("B1".to_string());
    listing.property_type = Some("Terrace House".to_string());
    listing
}

pub(super) fn apartment(property_id: &str, price: f64, distance_km: f64) -> Listing {
    let mut listing = Listing::new(property_id, price);
    listing.location = format!("Apartment {property_id}, Lisburn Road, Belfast");
    listing.calculated_monthly_payment = Some(400.0);
    listing.bedrooms = Some(2);
    listing.distance_to_destination = Some(distance_km);
    listing.perplexity_rating = Some(6.0);
    listing.tenure = Some("Leasehold".to_string());
    listing.lease_years = Some(120);
    listing.heating = Some("Electric".to_string());
    listing.energy_rating = Some("C72".to_string());
    listing.property_type = Some("Apartment".to_string());
    listing
}

pub(super) fn default_engine() -> PriorityEngine {
    PriorityEngine::new(PriorityWeights::default())
}

pub(super) fn ranked(listings: &[Listing]) -> Vec<ScoredListing> {
    default_engine().rank(listings)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
