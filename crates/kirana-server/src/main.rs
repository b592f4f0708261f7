//! # kirana-server entry point
//!
//! Parses command-line arguments, initializes tracing, loads the delivery
//! configuration, picks a geocoder, and serves the API.
//!
//! Geocoder selection: the OpenCage adapter when `KIRANA_GEOCODE_API_KEY`
//! is set, otherwise the deterministic offline geocoder (demo mode, no
//! real address resolution). The choice is logged at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kirana_api::AppState;
use kirana_delivery::geocode::{OpenCageConfig, OpenCageGeocoder};
use kirana_delivery::{DeliveryConfig, DeliveryPricing, Geocoder, OfflineGeocoder};

/// Environment variable carrying the OpenCage API key.
const GEOCODE_API_KEY_VAR: &str = "KIRANA_GEOCODE_API_KEY";

/// Kirana delivery API server.
#[derive(Parser, Debug)]
#[command(name = "kirana-server", version, about, long_about = None)]
struct Cli {
    /// Socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Path to a YAML delivery configuration file. Defaults to the
    /// built-in Delhi configuration when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ISO 3166-1 alpha-2 country hint passed to the geocoding provider.
    #[arg(long, default_value = "in")]
    country_hint: String,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DeliveryConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            let config: DeliveryConfig = serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?;
            Ok(config)
        }
        None => Ok(DeliveryConfig::default()),
    }
}

fn build_geocoder(
    config: &DeliveryConfig,
    country_hint: &str,
) -> anyhow::Result<Arc<dyn Geocoder>> {
    match std::env::var(GEOCODE_API_KEY_VAR) {
        Ok(api_key) if !api_key.trim().is_empty() => {
            tracing::info!("using OpenCage geocoder");
            let geocoder = OpenCageGeocoder::new(
                OpenCageConfig::new(api_key.trim()).with_country_hint(country_hint),
            )
            .context("building OpenCage geocoder")?;
            Ok(Arc::new(geocoder))
        }
        _ => {
            tracing::warn!(
                "{GEOCODE_API_KEY_VAR} not set — using offline geocoder; \
                 every address will appear to be near the store"
            );
            Ok(Arc::new(OfflineGeocoder::new(config.store.coordinates)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_ref())?;
    tracing::info!(
        store = %config.store.address,
        zones = config.zones.len(),
        "delivery configuration loaded"
    );

    let geocoder = build_geocoder(&config, &cli.country_hint)?;
    let pricing = DeliveryPricing::new(config, geocoder).context("invalid delivery config")?;
    let app = kirana_api::app(AppState::new(pricing));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "kirana-server listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
