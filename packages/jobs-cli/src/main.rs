//! Job listing aggregator CLI
//!
//! Prints JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use job_aggregator::{
    Aggregator, HttpFetcher, ListingFilter, ListingRecord, ListingStore, MemoryStore, SourceKind,
};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "jobs")]
#[command(about = "Search job listing sites and cache the results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every source for a job title
    Search {
        /// Job title, e.g. `data analyst`
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// List cached listings
    List {
        /// Only employers containing this text (case-insensitive)
        #[arg(long)]
        employer: Option<String>,

        /// Only listings from this source (MyCareersFuture, JobStreet)
        #[arg(long)]
        source: Option<SourceKind>,
    },

    /// Show cached listings by id
    Show {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },

    /// Remove every cached listing
    Clear,
}

#[derive(Serialize)]
struct SearchOutput {
    success: bool,
    count: usize,
    message: String,
    jobs: Vec<ListingRecord>,
}

#[derive(Serialize)]
struct ListOutput {
    count: usize,
    jobs: Vec<ListingRecord>,
}

#[derive(Serialize)]
struct ClearOutput {
    success: bool,
    removed: usize,
}

type SharedStore = Arc<dyn ListingStore>;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,job_aggregator=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let aggregator_config = config.aggregator_config()?;

    let fetcher = HttpFetcher::with_user_agent(&aggregator_config.user_agent)
        .context("failed to build HTTP client")?;
    let store = open_store(&config).await?;
    let aggregator = Aggregator::with_default_sources(store, Arc::new(fetcher), aggregator_config);

    let result = execute(&aggregator, cli.command).await;
    aggregator.shutdown().await;
    result
}

async fn open_store(config: &Config) -> Result<SharedStore> {
    match &config.database_url {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let store = job_aggregator::PostgresStore::connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            tracing::info!("Using PostgreSQL listing store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            warn!("DATABASE_URL is set but this build has no postgres support, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn execute(aggregator: &Aggregator<SharedStore>, command: Commands) -> Result<()> {
    match command {
        Commands::Search { title } => {
            let query = title.join(" ");
            let summary = aggregator
                .aggregate(&query)
                .await
                .with_context(|| format!("search for '{}' failed", query))?;

            print_json(&SearchOutput {
                success: true,
                count: summary.count,
                message: summary.message(),
                jobs: summary.records,
            })
        }
        Commands::List { employer, source } => {
            let filter = ListingFilter {
                employer,
                source,
            };
            let jobs = aggregator.list_records(&filter).await?;
            print_json(&ListOutput {
                count: jobs.len(),
                jobs,
            })
        }
        Commands::Show { ids } => {
            let jobs = aggregator.list_by_ids(&ids).await?;
            print_json(&ListOutput {
                count: jobs.len(),
                jobs,
            })
        }
        Commands::Clear => {
            let removed = aggregator.clear().await?;
            print_json(&ClearOutput {
                success: true,
                removed,
            })
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
