use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentinel::chatter::{ChatterSource, MockChatter};
use sentinel::config::DiseaseCatalog;
use sentinel::server::{SentinelServer, ServerConfig};

#[derive(Parser)]
#[command(
    name = "sentinel",
    version,
    about = "Disease outbreak early-warning service combining search-trend and social-chatter signals",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind address (host:port)
        #[arg(short, long)]
        bind: Option<String>,

        /// Disease catalog TOML file (built-in catalog if omitted)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Trend provider base URL
        #[arg(long)]
        provider_url: Option<String>,

        /// Trend cache TTL in minutes
        #[arg(long, default_value = "10")]
        cache_ttl: i64,
    },

    /// Run the fetch-then-score pipeline once and print the JSON report
    Assess {
        /// Disease identifier (flu, dengue, covid, ...)
        disease: String,

        /// City name for the chatter scan
        #[arg(long, default_value = "kanpur")]
        city: String,

        /// Geography code for the trend query
        #[arg(long, default_value = "IN-UP")]
        geo: String,

        /// Trend provider base URL
        #[arg(long)]
        provider_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    if let Err(e) = sentinel::metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics initialization failed, continuing without metrics");
    }

    match cli.command {
        Commands::Serve {
            bind,
            catalog,
            provider_url,
            cache_ttl,
        } => serve(bind, catalog, provider_url, cache_ttl).await?,

        Commands::Assess {
            disease,
            city,
            geo,
            provider_url,
        } => assess(disease, city, geo, provider_url).await?,
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("sentinel=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("sentinel=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn load_catalog(path: Option<PathBuf>) -> Result<DiseaseCatalog> {
    match path {
        Some(path) => DiseaseCatalog::from_toml_file(path),
        None => Ok(DiseaseCatalog::default()),
    }
}

fn build_config(
    bind: Option<String>,
    provider_url: Option<String>,
    cache_ttl: i64,
) -> Result<ServerConfig> {
    let mut builder = ServerConfig::builder().cache_ttl_minutes(cache_ttl);
    if let Some(bind) = bind {
        builder = builder.bind_address_str(&bind)?;
    }
    if let Some(url) = provider_url {
        builder = builder.provider_url(url);
    }
    Ok(builder.build()?)
}

async fn serve(
    bind: Option<String>,
    catalog: Option<PathBuf>,
    provider_url: Option<String>,
    cache_ttl: i64,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let config = build_config(bind, provider_url, cache_ttl)?;

    tracing::info!(
        diseases = catalog.len(),
        bind = %config.bind_address,
        "Starting sentinel backend"
    );

    let server = SentinelServer::new(config, catalog)?;
    server
        .start_with_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn assess(
    disease: String,
    city: String,
    geo: String,
    provider_url: Option<String>,
) -> Result<()> {
    let catalog = DiseaseCatalog::default();
    let disease_config = catalog
        .get(&disease)
        .ok_or_else(|| anyhow::anyhow!("Disease not configured: {disease}"))?;

    let config = build_config(None, provider_url, 10)?;
    let server = SentinelServer::new(config, catalog.clone())?;
    let state = server.state();

    let (series, chart) = state.fetcher.fetch(disease_config, &geo).await;
    let chatter = MockChatter::new();
    let social_score = chatter.chatter_score(disease_config, &city);
    let assessment = sentinel::scoring::score(series.as_ref(), social_score, disease_config);

    let report = sentinel::models::ThreatReport {
        city,
        disease,
        geo,
        threat_score: assessment.score,
        threat_level: assessment.level,
        action_item: assessment.action,
        chart_data: chart,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
