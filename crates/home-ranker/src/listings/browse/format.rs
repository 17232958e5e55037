use super::super::domain::MILES_PER_KM;
use serde::Serialize;

pub(crate) const WALKING_LIMIT_MILES: f64 = 0.6;
const SHORT_WALK_LIMIT_MILES: f64 = 1.5;

/// Whole pounds with thousands separators, e.g. `£105,000`.
pub fn format_price(price: f64) -> String {
    format!("£{}", group_thousands(price.round() as i64))
}

pub fn format_monthly(monthly: Option<f64>) -> String {
    match monthly {
        Some(value) => format!("£{}/mo", group_thousands(value.round() as i64)),
        None => "N/A".to_string(),
    }
}

pub fn format_distance(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) => format!("{:.1}mi", km * MILES_PER_KM),
        None => "N/A".to_string(),
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head.trim())
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 50.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    Good,
    Fair,
    Poor,
}

impl RatingTier {
    pub fn for_rating(rating: f64) -> Self {
        if rating < 5.0 {
            Self::Poor
        } else if rating < 7.0 {
            Self::Fair
        } else {
            Self::Good
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceTier {
    Walking,
    ShortWalk,
    Commute,
    Unknown,
}

impl DistanceTier {
    pub fn for_distance_km(distance_km: Option<f64>) -> Self {
        match distance_km.map(|km| km * MILES_PER_KM) {
            None => Self::Unknown,
            Some(miles) if miles <= WALKING_LIMIT_MILES => Self::Walking,
            Some(miles) if miles <= SHORT_WALK_LIMIT_MILES => Self::ShortWalk,
            Some(_) => Self::Commute,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::ShortWalk => "Short walk",
            Self::Commute => "Commute",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_use_thousands_separators() {
        assert_eq!(format_price(105_000.0), "£105,000");
        assert_eq!(format_price(999.0), "£999");
        assert_eq!(format_price(1_250_000.4), "£1,250,000");
    }

    #[test]
    fn monthly_and_distance_report_missing_values() {
        assert_eq!(format_monthly(Some(1_234.6)), "£1,235/mo");
        assert_eq!(format_monthly(None), "N/A");
        assert_eq!(format_distance(Some(1.0)), "0.6mi");
        assert_eq!(format_distance(None), "N/A");
    }

    #[test]
    fn truncate_text_appends_ellipsis() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("Spacious terrace house ", 16), "Spacious terrace...");
    }

    #[test]
    fn tiers_follow_badge_thresholds() {
        assert_eq!(PriorityTier::for_score(50.0), PriorityTier::High);
        assert_eq!(PriorityTier::for_score(49.9), PriorityTier::Medium);
        assert_eq!(PriorityTier::for_score(39.9), PriorityTier::Low);
        assert_eq!(RatingTier::for_rating(4.9), RatingTier::Poor);
        assert_eq!(RatingTier::for_rating(6.5), RatingTier::Fair);
        assert_eq!(RatingTier::for_rating(7.0), RatingTier::Good);
        assert_eq!(DistanceTier::for_distance_km(Some(0.5)), DistanceTier::Walking);
        assert_eq!(DistanceTier::for_distance_km(Some(2.0)), DistanceTier::ShortWalk);
        assert_eq!(DistanceTier::for_distance_km(Some(5.0)), DistanceTier::Commute);
        assert_eq!(DistanceTier::for_distance_km(None), DistanceTier::Unknown);
    }
}
