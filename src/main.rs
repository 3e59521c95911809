//! Delivery planning CLI.
//!
//! Reads a delivery table, plans capacity-bounded round trips anchored at
//! the depot, and writes the routes as a CSV report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use delivery_planner::haversine::Haversine;
use delivery_planner::report::write_routes_to_path;
use delivery_planner::solver::{PlanConfig, plan};
use delivery_planner::table::read_gifts_from_path;

/// Veliky Ustyug, the default depot.
const DEFAULT_DEPOT_LAT: f64 = 60.7603243;
const DEFAULT_DEPOT_LNG: f64 = 46.3053893;

#[derive(Debug, Parser)]
#[command(
    name = "delivery-planner",
    about = "Plan capacity-bounded delivery routes from a depot"
)]
struct Cli {
    /// Delivery table, whitespace- or comma-delimited.
    input: PathBuf,

    /// Where to write the route report.
    #[arg(short, long, default_value = "output_routes.csv")]
    output: PathBuf,

    /// Depot latitude, degrees.
    #[arg(long, default_value_t = DEFAULT_DEPOT_LAT)]
    depot_lat: f64,

    /// Depot longitude, degrees.
    #[arg(long, default_value_t = DEFAULT_DEPOT_LNG)]
    depot_lng: f64,

    /// Maximum total weight per batch.
    #[arg(long, default_value_t = 100.0)]
    capacity: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delivery_planner=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let gifts = read_gifts_from_path(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    tracing::info!(rows = gifts.len(), "loaded delivery table");

    let config = PlanConfig {
        depot: (cli.depot_lat, cli.depot_lng),
        capacity: cli.capacity,
    };
    let outcome = plan(&gifts, &config, &Haversine)?;

    write_routes_to_path(&cli.output, &outcome.records)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    let total_km: f64 = outcome.records.iter().map(|r| r.total_distance_km).sum();
    tracing::info!(
        routes = outcome.records.len(),
        skipped = outcome.skipped.len(),
        total_km,
        output = %cli.output.display(),
        "routes written"
    );

    Ok(())
}
