use chrono::NaiveDateTime;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kilometres to statute miles.
pub const MILES_PER_KM: f64 = 0.621371;

/// Latitude/longitude pair attached from the geocoding side-table. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One scraped property record.
///
/// Every optional field keeps "unknown" distinct from zero or empty so the
/// scoring defaults apply only to data that is genuinely missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub property_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub location: String,
    pub price: f64,
    #[serde(default)]
    pub calculated_monthly_payment: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    /// Floor size in square metres.
    #[serde(default)]
    pub size: Option<f64>,
    /// Distance to the reference destination in kilometres.
    #[serde(default)]
    pub distance_to_destination: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub perplexity_analysis: Option<String>,
    /// AI-generated quality rating on a 0-10 scale.
    #[serde(default)]
    pub perplexity_rating: Option<f64>,
    #[serde(default)]
    pub tenure: Option<String>,
    #[serde(default)]
    pub heating: Option<String>,
    #[serde(default)]
    pub energy_rating: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    /// Whole years left on a leasehold. Fractional input is truncated.
    #[serde(default, deserialize_with = "whole_lease_years")]
    pub lease_years: Option<u32>,
    #[serde(default)]
    pub scraped_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Listing {
    /// Listing with only the mandatory identity and price populated.
    pub fn new(property_id: impl Into<String>, price: f64) -> Self {
        Self {
            property_id: property_id.into(),
            url: String::new(),
            location: String::new(),
            price,
            calculated_monthly_payment: None,
            bedrooms: None,
            bathrooms: None,
            size: None,
            distance_to_destination: None,
            description: None,
            perplexity_analysis: None,
            perplexity_rating: None,
            tenure: None,
            heating: None,
            energy_rating: None,
            property_type: None,
            lease_years: None,
            scraped_at: None,
            coordinates: None,
        }
    }

    pub fn distance_miles(&self) -> Option<f64> {
        self.distance_to_destination.map(|km| km * MILES_PER_KM)
    }
}

/// Unrounded sub-scores that fed a priority score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub location: f64,
    pub price: f64,
    pub monthly: f64,
    pub quality: f64,
}

/// A listing that survived the kill switches, with its ranking scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub priority_score: f64,
    pub location_score: u8,
    pub factors: ScoreFactors,
}

/// Reads a remaining lease as whole years from a number or numeric text.
///
/// Fractions are truncated toward zero and negatives clamp to zero, so a
/// 59.5 year lease still counts as short. Blank or non-numeric text is unknown.
pub(crate) fn whole_lease_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LeaseYearsVisitor;

    impl<'de> Visitor<'de> for LeaseYearsVisitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("remaining lease years as a number or numeric text")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(u32::try_from(value).unwrap_or(u32::MAX)))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(u32::try_from(value.max(0)).unwrap_or(u32::MAX)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(whole_years(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.trim().parse::<f64>().ok().and_then(whole_years))
        }
    }

    deserializer.deserialize_any(LeaseYearsVisitor)
}

fn whole_years(value: f64) -> Option<u32> {
    if value.is_nan() {
        return None;
    }

    // Float to int casts saturate, so infinities land on the bounds.
    Some(value.max(0.0) as u32)
}
