//! # route-worker
//!
//! The scheduled batch entry point: generates today's delivery routes from
//! every order awaiting shipment, then runs the route completion
//! reconciliation pass.
//!
//! ```bash
//! RUST_LOG=info route-worker --config config/dev.toml --orders demos/orders.toml --sheet routes.toml
//! ```

use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use route_dispatch::config::Config;
use route_dispatch::geocoder;
use route_dispatch::lifecycle::{setup_tracing, DispatchSystem};
use route_dispatch::model::Order;
use route_dispatch::routing::{daily_cutoff, DispatchSheet};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, Instrument};

#[derive(Debug, Parser)]
#[command(name = "route-worker", version, about = "Generates delivery routes from pending orders")]
struct Args {
    /// Config file (falls back to CONFIG_FILE, then config/dev.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file of orders to seed the store with
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Cutoff override (RFC 3339). Defaults to today at routing.cutoff_hour UTC
    #[arg(long)]
    cutoff: Option<DateTime<Utc>>,

    /// Write the generated routes as a TOML dispatch sheet
    #[arg(long)]
    sheet: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct OrderFile {
    #[serde(default)]
    orders: Vec<OrderSeed>,
}

#[derive(Debug, Deserialize)]
struct OrderSeed {
    id: String,
    customer_address: String,
    created_at: Option<DateTime<Utc>>,
}

/// Reads seed orders. Orders without a timestamp are placed an hour before the cutoff.
fn load_orders(path: &Path, cutoff: DateTime<Utc>) -> anyhow::Result<Vec<Order>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read order file {}", path.display()))?;
    let file: OrderFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse order file {}", path.display()))?;

    Ok(file
        .orders
        .into_iter()
        .map(|seed| {
            let created_at = seed.created_at.unwrap_or(cutoff - Duration::hours(1));
            Order::new(seed.id, seed.customer_address, created_at)
        })
        .collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let cutoff = match args.cutoff {
        Some(cutoff) => cutoff,
        None => daily_cutoff(Utc::now(), config.routing.cutoff_hour)
            .ok_or_else(|| anyhow!("invalid cutoff hour {}", config.routing.cutoff_hour))?,
    };
    info!(%cutoff, provider = ?config.geocoder.provider, "Starting route worker");

    let system = DispatchSystem::start(&config.store);

    if let Some(path) = &args.orders {
        let orders = load_orders(path, cutoff)?;
        let seeded = system.store.insert_orders(orders).await?;
        info!(seeded, file = %path.display(), "Orders seeded");
    }

    let geocoder = geocoder::from_config(&config.geocoder).context("Failed to build geocoder")?;
    let service = system.routing_service(geocoder, &config.routing);

    let report = service
        .generate_routes(cutoff)
        .instrument(info_span!("generate_routes"))
        .await?;
    info!(
        orders = report.orders_seen,
        addresses = report.unique_addresses,
        skipped = report.addresses_skipped,
        routes = report.routes_created,
        failed = report.routes_failed,
        "Generation report"
    );

    if let Some(path) = &args.sheet {
        let mut routes = Vec::with_capacity(report.route_ids.len());
        for id in &report.route_ids {
            routes.extend(system.store.get_route(*id).await?);
        }
        let sheet = DispatchSheet { report, routes };
        fs::write(path, sheet.to_toml()?)
            .with_context(|| format!("Failed to write dispatch sheet {}", path.display()))?;
        info!(routes = sheet.routes.len(), file = %path.display(), "Dispatch sheet written");
    }

    let completed = service.reconcile_route_completion().await?;
    info!(completed, "Reconciliation finished");

    drop(service);
    system.shutdown().await?;
    Ok(())
}
