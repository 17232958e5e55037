use crate::cli::{FilterArgs, WeightArgs};
use crate::infra::load_snapshot;
use chrono::{Local, NaiveDateTime};
use clap::Args;
use home_ranker::config::AppConfig;
use home_ranker::error::AppError;
use home_ranker::listings::browse::format::{
    format_distance, format_monthly, format_price, truncate_text, DistanceTier, PriorityTier,
    RatingTier,
};
use home_ranker::listings::browse::{DashboardSummary, DistributionBucket};
use home_ranker::listings::{
    ExcludedListing, PriorityEngine, PriorityWeights, ScoredListing, Snapshot, WeightFactor,
};
use home_ranker::telemetry::{self, LogOutput};
use std::path::PathBuf;

const LOCATION_WIDTH: usize = 40;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Listing snapshot to rank (.json or .csv). Defaults to LISTINGS_SNAPSHOT_PATH.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
    /// Maximum number of rows to print
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
    /// Also list the listings removed by the cash-only and short-lease rules
    #[arg(long)]
    pub(crate) show_excluded: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Listing snapshot to summarise (.json or .csv). Defaults to LISTINGS_SNAPSHOT_PATH.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        snapshot,
        weights,
        filter,
        limit,
        show_excluded,
    } = args;

    let (snapshot, path) = load_report_snapshot(snapshot)?;
    let weights = weights.weights();
    let outcome = PriorityEngine::new(weights).rank_with_exclusions(&snapshot.listings);
    let matches = filter.filter().apply(outcome.ranked);

    println!("Priority ranking for {}", path.display());
    println!("{}", weights_line(&weights));
    println!(
        "{} listings match | {} excluded | {} records skipped | last scraped {}",
        matches.len(),
        outcome.excluded.len(),
        snapshot.skipped,
        freshness_label(snapshot.latest_scraped_at, Local::now().naive_local())
    );
    for line in rank_table_lines(&matches, limit) {
        println!("{line}");
    }

    if show_excluded {
        for line in excluded_lines(&outcome.excluded) {
            println!("{line}");
        }
    }

    Ok(())
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        snapshot,
        weights,
        filter,
    } = args;

    let (snapshot, path) = load_report_snapshot(snapshot)?;
    let ranked = filter
        .filter()
        .apply(PriorityEngine::new(weights.weights()).rank(&snapshot.listings));
    let summary = DashboardSummary::from_listings(&ranked);

    println!("Listing dashboard for {}", path.display());
    println!(
        "- Last scraped {}",
        freshness_label(snapshot.latest_scraped_at, Local::now().naive_local())
    );
    for line in dashboard_lines(&summary) {
        println!("{line}");
    }

    Ok(())
}

fn load_report_snapshot(path: Option<PathBuf>) -> Result<(Snapshot, PathBuf), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = path {
        config.listings.snapshot_path = path;
    }

    telemetry::init(&config.telemetry, LogOutput::Stderr)?;

    let snapshot = load_snapshot(&config.listings)?;
    Ok((snapshot, config.listings.snapshot_path))
}

fn weights_line(weights: &PriorityWeights) -> String {
    let parts: Vec<String> = WeightFactor::ordered()
        .into_iter()
        .map(|factor| format!("{} {:.2}", factor.label(), weights.get(factor)))
        .collect();
    format!("Weights: {} (sum {:.2})", parts.join(" | "), weights.total())
}

fn rank_table_lines(matches: &[ScoredListing], limit: usize) -> Vec<String> {
    if matches.is_empty() {
        return vec!["No listings match the current filters.".to_string()];
    }

    let mut lines = vec![format!(
        "{:>3}  {:>6}  {:<8}  {:<9}  {:<10}  {:<18}  {:<4}  {:<10}  {}",
        "#", "Score", "Priority", "Price", "Monthly", "Distance", "Beds", "AI rating", "Location"
    )];

    for (index, scored) in matches.iter().take(limit).enumerate() {
        let listing = &scored.listing;
        let distance = format!(
            "{} {}",
            format_distance(listing.distance_to_destination),
            DistanceTier::for_distance_km(listing.distance_to_destination).label()
        );
        let rating = listing
            .perplexity_rating
            .map(|rating| format!("{rating:.1} {}", RatingTier::for_rating(rating).label()))
            .unwrap_or_else(|| "N/A".to_string());
        let beds = listing
            .bedrooms
            .map(|beds| beds.to_string())
            .unwrap_or_else(|| "-".to_string());

        lines.push(format!(
            "{:>3}  {:>6.1}  {:<8}  {:<9}  {:<10}  {:<18}  {:<4}  {:<10}  {}",
            index + 1,
            scored.priority_score,
            PriorityTier::for_score(scored.priority_score).label(),
            format_price(listing.price),
            format_monthly(listing.calculated_monthly_payment),
            distance,
            beds,
            rating,
            truncate_text(&listing.location, LOCATION_WIDTH)
        ));
    }

    if matches.len() > limit {
        lines.push(format!("... {} more not shown", matches.len() - limit));
    }

    lines
}

fn excluded_lines(excluded: &[ExcludedListing]) -> Vec<String> {
    if excluded.is_empty() {
        return vec!["Excluded listings: none".to_string()];
    }

    let mut lines = vec!["Excluded listings:".to_string()];
    lines.extend(
        excluded
            .iter()
            .map(|entry| format!("  - {}: {}", entry.property_id, entry.reason.summary())),
    );
    lines
}

fn dashboard_lines(summary: &DashboardSummary) -> Vec<String> {
    let stats = &summary.stats;
    let average_distance = stats
        .average_distance_miles
        .map(|miles| format!("{miles:.1}mi"))
        .unwrap_or_else(|| "N/A".to_string());

    let mut lines = vec![
        format!(
            "- {} listings | avg price {} | median price {}",
            stats.count,
            format_price(stats.average_price as f64),
            format_price(stats.median_price)
        ),
        format!(
            "- avg distance {} | {}% within walking distance | avg priority {:.1}",
            average_distance, stats.walking_distance_pct, stats.average_score
        ),
    ];

    for (title, buckets) in [
        ("Priority score distribution", &summary.score_distribution),
        ("Price distribution", &summary.price_distribution),
        ("Distance distribution", &summary.distance_distribution),
    ] {
        lines.push(format!("{title}:"));
        lines.extend(histogram_lines(buckets));
    }

    lines
}

fn histogram_lines(buckets: &[DistributionBucket]) -> Vec<String> {
    buckets
        .iter()
        .map(|bucket| {
            format!(
                "  {:<10} {:>3} {}",
                bucket.label,
                bucket.count,
                "#".repeat(bucket.count)
            )
        })
        .collect()
}

fn freshness_label(latest: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(latest) = latest else {
        return "unknown".to_string();
    };

    let age = now.signed_duration_since(latest);
    let stamp = latest.format("%Y-%m-%d %H:%M");
    if age.num_days() >= 1 {
        format!("{stamp} ({} days ago)", age.num_days())
    } else if age.num_hours() >= 1 {
        format!("{stamp} ({} hours ago)", age.num_hours())
    } else {
        format!("{stamp} (just now)")
    }
}
