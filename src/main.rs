use anyhow::{Context, Result};
use charger_scout::api::{self, AppState, SearchParams};
use charger_scout::config::Config;
use charger_scout::seed::{builtin_chargers, load_seed_file, seed};
use charger_scout::store::MemoryStore;
use charger_scout::ChargerSearch;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "charger-scout", about = "Find EV chargers near a location")]
struct Cli {
    /// TOML file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the store and serve the HTTP API
    Serve,
    /// Seed the store and run a single search
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
    /// Search radius in km
    #[arg(long)]
    radius: Option<f64>,
    #[arg(long)]
    limit: Option<usize>,
    /// Minimum power in kW
    #[arg(long)]
    min_power: Option<f64>,
    /// Maximum price per kWh
    #[arg(long)]
    max_price: Option<f64>,
    /// Text matched against name or address
    #[arg(long)]
    q: Option<String>,
    /// distance, power, price or updated
    #[arg(long)]
    sort: Option<String>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let store = Arc::new(MemoryStore::new());
    seed_store(&store, &config).await?;
    let search = ChargerSearch::with_store(store.clone(), &config.store.geo_key, &config.store.key_prefix);

    let outcome = match cli.command {
        Command::Serve => serve(search, &config).await,
        Command::Search(args) => run_search(search, &config, args).await,
    };

    store.close();
    outcome
}

async fn seed_store(store: &MemoryStore, config: &Config) -> Result<()> {
    let mut chargers = Vec::new();
    if config.seed.builtin {
        chargers.extend(builtin_chargers());
    }
    if let Some(path) = &config.seed.file {
        chargers.extend(load_seed_file(path).await?);
    }
    seed(store, &config.store, &chargers).await?;
    Ok(())
}

async fn serve(search: ChargerSearch, config: &Config) -> Result<()> {
    let state = Arc::new(AppState {
        search,
        limits: config.search.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("🔌 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")
}

async fn run_search(search: ChargerSearch, config: &Config, args: SearchArgs) -> Result<()> {
    let params = SearchParams {
        lat: args.lat,
        lng: args.lng,
        radius: args.radius,
        limit: args.limit,
        min_power: args.min_power,
        max_price: args.max_price,
        q: args.q,
        sort: args.sort,
    };
    let query = params.into_query(&config.search)?;
    let results = search
        .search_with_timeout(&query, config.search.request_timeout())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    info!("✅ Found {} chargers\n", results.len());
    for (i, record) in results.iter().enumerate() {
        println!(
            "{}. {} ({:.1} km)",
            i + 1,
            record.name.as_deref().unwrap_or("<unnamed>"),
            record.distance_km
        );
        if let Some(address) = &record.address {
            println!("   {}", address);
        }
        println!("   {} kW, {} per kWh", record.power_kw, record.price_per_kwh);
        if !record.amenities.is_empty() {
            println!("   Amenities: {}", record.amenities.join(", "));
        }
        println!("   ID: {}", record.id);
        println!();
    }

    Ok(())
}
