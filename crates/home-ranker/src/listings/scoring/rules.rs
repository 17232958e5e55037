use super::super::domain::{Listing, MILES_PER_KM};
use super::ExclusionReason;

pub(crate) const DEFAULT_LEASE_YEARS: u32 = 999;
pub(crate) const DEFAULT_DISTANCE_MILES: f64 = 5.0;
pub(crate) const DEFAULT_MONTHLY_PAYMENT: f64 = 0.0;
pub(crate) const DEFAULT_RATING: f64 = 5.0;

const MINIMUM_LEASE_YEARS: u32 = 60;
const CASH_ONLY_PHRASE: &str = "cash offers only";

const WALKING_LIMIT_MILES: f64 = 0.6;
const SHORT_WALK_LIMIT_MILES: f64 = 1.5;

const MONTHLY_BUDGET: f64 = 800.0;
const OIL_HEATING_PENALTY: f64 = 60.0;
const ELECTRIC_HEATING_PENALTY: f64 = 100.0;

const PRICE_CEILING: f64 = 140_000.0;

const EPC_BONUS: f64 = 20.0;
const HOUSE_BONUS: f64 = 10.0;

/// Listing inputs with every missing value replaced by its scoring default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedInputs {
    pub lease_years: u32,
    pub distance_miles: f64,
    pub monthly_payment: f64,
    pub rating: f64,
}

impl ResolvedInputs {
    pub(crate) fn from_listing(listing: &Listing) -> Self {
        Self {
            lease_years: resolve_lease_years(listing.lease_years),
            distance_miles: resolve_distance_miles(listing.distance_to_destination),
            monthly_payment: resolve_monthly_payment(listing.calculated_monthly_payment),
            rating: resolve_rating(listing.perplexity_rating),
        }
    }
}

fn resolve_lease_years(lease_years: Option<u32>) -> u32 {
    lease_years.unwrap_or(DEFAULT_LEASE_YEARS)
}

// Missing distance is deliberately expensive.
fn resolve_distance_miles(distance_km: Option<f64>) -> f64 {
    distance_km
        .map(|km| km * MILES_PER_KM)
        .unwrap_or(DEFAULT_DISTANCE_MILES)
}

fn resolve_monthly_payment(payment: Option<f64>) -> f64 {
    payment.unwrap_or(DEFAULT_MONTHLY_PAYMENT)
}

fn resolve_rating(rating: Option<f64>) -> f64 {
    rating.unwrap_or(DEFAULT_RATING)
}

pub(crate) fn exclusion_for(
    listing: &Listing,
    inputs: &ResolvedInputs,
) -> Option<ExclusionReason> {
    if listing
        .description
        .as_deref()
        .is_some_and(|text| text.to_lowercase().contains(CASH_ONLY_PHRASE))
    {
        return Some(ExclusionReason::CashOffersOnly);
    }

    if listing.tenure.as_deref() == Some("Leasehold") && inputs.lease_years < MINIMUM_LEASE_YEARS
    {
        return Some(ExclusionReason::ShortLease {
            years_remaining: inputs.lease_years,
        });
    }

    None
}

/// Three-tier walking-distance curve: flat, steep decay, then a long tail.
pub(crate) fn location_score(distance_miles: f64) -> f64 {
    if distance_miles <= WALKING_LIMIT_MILES {
        100.0
    } else if distance_miles <= SHORT_WALK_LIMIT_MILES {
        let progress =
            (distance_miles - WALKING_LIMIT_MILES) / (SHORT_WALK_LIMIT_MILES - WALKING_LIMIT_MILES);
        100.0 - progress * 60.0
    } else {
        (40.0 - (distance_miles - SHORT_WALK_LIMIT_MILES) * 10.0).max(0.0)
    }
}

pub(crate) fn heating_penalty(heating: Option<&str>) -> f64 {
    match heating {
        Some("Oil") => OIL_HEATING_PENALTY,
        Some("Electric") => ELECTRIC_HEATING_PENALTY,
        _ => 0.0,
    }
}

pub(crate) fn monthly_score(monthly_payment: f64, heating: Option<&str>) -> f64 {
    let effective = monthly_payment + heating_penalty(heating);
    ((1.0 - effective / MONTHLY_BUDGET) * 100.0).max(0.0)
}

/// A zero price counts as "no price" and scores nothing.
pub(crate) fn price_score(price: f64) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    ((1.0 - price / PRICE_CEILING) * 100.0).max(0.0)
}

pub(crate) fn quality_score(
    rating: f64,
    energy_rating: Option<&str>,
    property_type: Option<&str>,
) -> f64 {
    let mut score = rating * 10.0;
    if energy_rating.is_some_and(|band| band.starts_with('B')) {
        score += EPC_BONUS;
    }
    if property_type.is_some_and(|kind| kind.to_lowercase().contains("house")) {
        score += HOUSE_BONUS;
    }
    score.clamp(0.0, 100.0)
}

/// Rounds the exact stored value to one fractional digit, halves away from
/// zero, matching one-digit decimal formatting.
///
/// `value * 10.0` can itself round up onto a half (64.55 is stored just below
/// it), so the digit is taken from the exact decimal expansion instead.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // Only quarter fractions sit exactly on a half at the second digit, and
    // scaling those by ten is exact.
    if (value * 4.0).fract() == 0.0 {
        return (value * 10.0).round() / 10.0;
    }

    format!("{value:.1}").parse().unwrap_or(value)
}

pub(crate) fn rounded_location_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
