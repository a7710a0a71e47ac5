//! `dmvwait` — crawls the DMV office directory and samples posted wait
//! times, persisting both as flat files under the configured data
//! directory.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod locations;
mod waits;

#[derive(Debug, Parser)]
#[command(name = "dmvwait")]
#[command(about = "DMV office directory crawler and wait-time sampler")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild the office directory from the locations search.
    Locations {
        /// Print what would be crawled without fetching or writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Sample current wait times for every office in the directory.
    Waits {
        /// Print what would be sampled without fetching or writing.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dmvwait_core::load_app_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Locations { dry_run }) => locations::run(&config, dry_run).await,
        Some(Commands::Waits { dry_run }) => waits::run(&config, dry_run).await,
        None => {
            println!("no command given; try `dmvwait locations` or `dmvwait waits`");
            Ok(())
        }
    }
}
