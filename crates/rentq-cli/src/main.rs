use clap::{Parser, Subcommand};
use rentq_core::{AppConfig, CategoryQuery, SearchRequest};
use rentq_query::QueryCoordinator;
use rentq_search::MarketplaceClient;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rentq")]
#[command(about = "Search rental offers from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search offers and print one page of results as JSON
    Search {
        /// Restrict results to this category id
        #[arg(long)]
        category: Option<String>,
        /// Free-text location, geocoded before the search
        #[arg(long)]
        location: Option<String>,
        /// Extra filter field as `key=value`; JSON values are parsed, anything else is a string
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, Value)>,
        /// Page to show (starting at 1)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List categories
    Categories {
        #[arg(long)]
        id: Option<String>,
        /// Shuffle the list
        #[arg(long)]
        rand: bool,
        /// With --rand, return a random sample of this size
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a random sample of offers
    Featured {
        #[arg(long, default_value_t = 3)]
        limit: u32,
    },
}

/// Parses a `key=value` filter argument.
fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key is empty in '{raw}'"));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn build_request(
    category: Option<String>,
    location: Option<String>,
    filters: Vec<(String, Value)>,
) -> SearchRequest {
    let mut request = SearchRequest::new();
    if let Some(category) = category {
        request = request.with_category(category);
    }
    if let Some(location) = location {
        request = request.with_location(location);
    }
    for (key, value) in filters {
        request = request.with_field(key, value);
    }
    request
}

fn marketplace(config: &AppConfig) -> anyhow::Result<MarketplaceClient> {
    Ok(MarketplaceClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = rentq_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Search {
            category,
            location,
            filters,
            page,
        } => {
            let coordinator = QueryCoordinator::from_config(&config)?;
            coordinator
                .submit_search(build_request(category, location, filters))
                .await;
            if page > 1 {
                coordinator.change_page(page)?;
            }
            let state = coordinator.snapshot();
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Categories { id, rand, limit } => {
            let client = marketplace(&config)?;
            let categories = client
                .fetch_categories(&CategoryQuery { id, rand, limit })
                .await?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        Commands::Featured { limit } => {
            let client = marketplace(&config)?;
            let offers = client.fetch_featured_offers(limit).await?;
            println!("{}", serde_json::to_string_pretty(&offers)?);
        }
    }

    Ok(())
}
