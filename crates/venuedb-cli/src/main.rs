mod run;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "venuedb-cli")]
#[command(about = "Scrape wedding venue listings into Elasticsearch or a CSV file")]
struct Cli {
    /// First listing page to walk (inclusive).
    #[arg(long = "first-page", alias = "first_page", default_value_t = 1)]
    first_page: u32,

    /// Listing page to stop at (exclusive).
    #[arg(long = "last-page", alias = "last_page", default_value_t = 11)]
    last_page: u32,

    /// Export complete venues to CSV instead of ingesting them.
    #[arg(long = "store-csv", alias = "store_csv")]
    store_csv: bool,

    /// Drop the index before ingesting.
    #[arg(long = "remove-index", alias = "remove_index")]
    remove_index: bool,

    /// CSV output path; overrides `VENUEDB_EXPORT_PATH`.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = venuedb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(output) = cli.output {
        config.export_path = output;
    }

    let walk = run::walk(&config, cli.first_page, cli.last_page).await?;
    println!(
        "walked {} listing pages: {} links, {} venues, {} skipped, {} name collisions",
        walk.stats.pages,
        walk.stats.links,
        walk.venues.len(),
        walk.stats.skipped,
        walk.stats.collisions
    );

    if cli.store_csv {
        run::export(&config, &walk.venues)?;
    } else {
        run::ingest(&config, &walk.venues, cli.remove_index).await?;
    }

    Ok(())
}
