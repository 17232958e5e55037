mod dashboard;
mod filters;
pub mod format;

pub use dashboard::{
    distance_distribution, price_distribution, score_distribution, DashboardStats,
    DashboardSummary, DistributionBucket,
};
pub use filters::{FacetOptions, ListingFilter};
