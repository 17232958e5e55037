use serde::{Deserialize, Serialize};

/// Multipliers applied to each sub-score.
///
/// The engine uses the raw values; callers that want the four weights to sum
/// to one normalise before ranking. Fields missing from serialized input keep
/// their default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub location: f64,
    pub price: f64,
    pub monthly: f64,
    pub rating: f64,
}

impl PriorityWeights {
    pub const DEFAULT: Self = Self {
        location: 0.6,
        price: 0.1,
        monthly: 0.2,
        rating: 0.1,
    };

    pub fn total(&self) -> f64 {
        self.location + self.price + self.monthly + self.rating
    }

    pub fn get(&self, factor: WeightFactor) -> f64 {
        match factor {
            WeightFactor::Location => self.location,
            WeightFactor::Price => self.price,
            WeightFactor::Monthly => self.monthly,
            WeightFactor::Rating => self.rating,
        }
    }

    fn set(&mut self, factor: WeightFactor, value: f64) {
        match factor {
            WeightFactor::Location => self.location = value,
            WeightFactor::Price => self.price = value,
            WeightFactor::Monthly => self.monthly = value,
            WeightFactor::Rating => self.rating = value,
        }
    }

    /// Scales the weights to sum to one. A non-positive total leaves them as-is.
    pub fn normalized(self) -> Self {
        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            return self;
        }

        Self {
            location: self.location / total,
            price: self.price / total,
            monthly: self.monthly / total,
            rating: self.rating / total,
        }
    }

    /// Replaces one weight and renormalises the set, the way a slider edit does.
    ///
    /// An edit that would leave nothing to normalise against returns the
    /// previous weights unchanged.
    pub fn with_adjusted(self, factor: WeightFactor, value: f64) -> Self {
        let mut edited = self;
        edited.set(factor, value);
        let total = edited.total();
        if total > 0.0 && total.is_finite() {
            edited.normalized()
        } else {
            self
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFactor {
    Location,
    Price,
    Monthly,
    Rating,
}

impl WeightFactor {
    pub const fn ordered() -> [Self; 4] {
        [Self::Location, Self::Price, Self::Monthly, Self::Rating]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Price => "Price",
            Self::Monthly => "Monthly Cost",
            Self::Rating => "AI Rating",
        }
    }
}
