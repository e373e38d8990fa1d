mod report;
mod search;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rankgrid-cli")]
#[command(about = "Grid ranking aggregator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a grid search and print the leaderboard.
    Search(SearchArgs),
    /// Print grid geometry for a size/radius pair without making any requests.
    Grid(GridArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Search term, e.g. "med spa".
    #[arg(long)]
    term: String,
    /// Latitude of the grid center.
    #[arg(long)]
    lat: f64,
    /// Longitude of the grid center.
    #[arg(long)]
    lng: f64,
    /// Search radius in miles (defaults to the configured value, capped at 30).
    #[arg(long)]
    radius: Option<f64>,
    /// Points per grid side (defaults to the configured value).
    #[arg(long)]
    grid_size: Option<u32>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    /// Name of the business to track across the grid.
    #[arg(long)]
    target: Option<String>,
    /// Place id of the tracked business; exact-match wins over name matching.
    #[arg(long, requires = "target")]
    target_place_id: Option<String>,
    /// How many leaderboard rows to print.
    #[arg(long, default_value_t = 20)]
    top: usize,
    /// Print the full report as JSON instead of the human-readable summary.
    #[arg(long)]
    json: bool,
    /// Write the per-point grid detail CSV to this path.
    #[arg(long)]
    export_grid: Option<std::path::PathBuf>,
    /// Write the competitor analysis CSV to this path.
    #[arg(long)]
    export_competitors: Option<std::path::PathBuf>,
}

#[derive(Debug, Args)]
struct GridArgs {
    #[arg(long, default_value_t = 13)]
    grid_size: u32,
    #[arg(long, default_value_t = 5.0)]
    radius: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => {
            let config = rankgrid_core::load_app_config()?;
            let env_filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
            search::run_search(&config, args).await
        }
        Commands::Grid(args) => {
            tracing_subscriber::fmt().with_env_filter(EnvFilter::new("info")).init();
            report::print_grid_summary(args.grid_size, args.radius);
            Ok(())
        }
    }
}
