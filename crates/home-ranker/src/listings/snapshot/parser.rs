use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Read;

/// One record as written by the scraper, before the price guard and
/// enrichment steps run.
#[derive(Debug, Deserialize)]
pub(crate) struct RawListing {
    pub(crate) property_id: String,
    #[serde(default)]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) location: String,
    #[serde(default)]
    pub(crate) price: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) scraped_at: Option<String>,
    #[serde(default)]
    pub(crate) perplexity_rating: Option<f64>,
    #[serde(default)]
    pub(crate) calculated_monthly_payment: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) perplexity_analysis: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) tenure: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) heating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) property_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) energy_rating: Option<String>,
    #[serde(default)]
    pub(crate) bedrooms: Option<u32>,
    #[serde(default)]
    pub(crate) bathrooms: Option<u32>,
    #[serde(default, deserialize_with = "floor_size")]
    pub(crate) size: Option<f64>,
    #[serde(default)]
    pub(crate) distance_to_destination: Option<f64>,
    #[serde(default, deserialize_with = "crate::listings::domain::whole_lease_years")]
    pub(crate) lease_years: Option<u32>,
}

impl RawListing {
    pub(crate) fn scraped_at(&self) -> Option<NaiveDateTime> {
        self.scraped_at.as_deref().and_then(parse_datetime)
    }
}

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<RawListing>, serde_json::Error> {
    serde_json::from_reader(reader)
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawListing>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<RawListing>() {
        records.push(record?);
    }

    Ok(records)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts either a bare number or scraped text such as "60 sq m (645.8 sq ft)".
fn floor_size<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FloorSizeVisitor;

    impl<'de> Visitor<'de> for FloorSizeVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a floor size as a number or descriptive text")
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

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(leading_number(value))
        }
    }

    deserializer.deserialize_any(FloorSizeVisitor)
}

fn leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || *ch == '.'))
        .map(|(index, _)| index)
        .unwrap_or(trimmed.len());

    trimmed[..end].parse().ok()
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
