use crate::report::{run_dashboard, run_rank, DashboardArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use home_ranker::error::AppError;
use home_ranker::listings::browse::ListingFilter;
use home_ranker::listings::PriorityWeights;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "home-ranker",
    about = "Rank scraped property listings by walkability, cost and quality",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the ranked listing table for a snapshot
    Rank(RankArgs),
    /// Print headline statistics and distributions for a snapshot
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Listing snapshot to serve (.json or .csv)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct WeightArgs {
    /// Weight applied to the walking-distance score
    #[arg(long, default_value_t = PriorityWeights::DEFAULT.location, allow_negative_numbers = true)]
    pub(crate) location: f64,
    /// Weight applied to the purchase price score
    #[arg(long, default_value_t = PriorityWeights::DEFAULT.price, allow_negative_numbers = true)]
    pub(crate) price: f64,
    /// Weight applied to the monthly cost score
    #[arg(long, default_value_t = PriorityWeights::DEFAULT.monthly, allow_negative_numbers = true)]
    pub(crate) monthly: f64,
    /// Weight applied to the AI quality rating score
    #[arg(long, default_value_t = PriorityWeights::DEFAULT.rating, allow_negative_numbers = true)]
    pub(crate) rating: f64,
    /// Scale the weights to sum to one before ranking
    #[arg(long)]
    pub(crate) normalize: bool,
}

impl WeightArgs {
    pub(crate) fn weights(&self) -> PriorityWeights {
        let weights = PriorityWeights {
            location: self.location,
            price: self.price,
            monthly: self.monthly,
            rating: self.rating,
        };
        if self.normalize {
            weights.normalized()
        } else {
            weights
        }
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct FilterArgs {
    /// Only keep listings whose location contains this text
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) min_price: f64,
    #[arg(long, default_value_t = 200_000.0)]
    pub(crate) max_price: f64,
    #[arg(long, default_value_t = 0)]
    pub(crate) min_beds: u32,
    /// Upper bound in miles; listings without a distance are always kept
    #[arg(long, default_value_t = 10.0)]
    pub(crate) max_distance: f64,
    #[arg(long)]
    pub(crate) heating: Option<String>,
    #[arg(long)]
    pub(crate) tenure: Option<String>,
    #[arg(long)]
    pub(crate) property_type: Option<String>,
    #[arg(long)]
    pub(crate) energy_rating: Option<String>,
}

impl FilterArgs {
    pub(crate) fn filter(&self) -> ListingFilter {
        ListingFilter {
            search: self.search.clone(),
            price_range: (self.min_price, self.max_price),
            min_bedrooms: self.min_beds,
            distance_range_miles: (0.0, self.max_distance),
            heating: self.heating.clone(),
            energy_rating: self.energy_rating.clone(),
            property_type: self.property_type.clone(),
            tenure: self.tenure.clone(),
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Dashboard(args) => run_dashboard(args),
    }
}
