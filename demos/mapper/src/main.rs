//! `mapper`: query a road network stored as the three tab files.
//!
//! ```text
//! mapper route   --data DIR --from 10 --to 42 --mode time
//! mapper aps     --data DIR --json
//! mapper nearest --data DIR --lat -36.85 --lon 174.76 --max-km 0.5
//! ```
//!
//! Logging goes through `env_logger`; `RUST_LOG` overrides `-v`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;

use rn_core::{CostMode, Location, NodeId};
use rn_graph::{find_articulation_points, find_path, load_from_dir, Adjacency, RoadNetwork};

#[derive(Parser)]
#[command(name = "mapper")]
#[command(about = "Routing and cut-vertex analysis over a road network", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest route between two intersections
    Route {
        /// Directory holding the .tab files
        #[arg(long)]
        data: PathBuf,
        /// Start node id
        #[arg(long)]
        from: u32,
        /// Goal node id
        #[arg(long)]
        to: u32,
        /// Cost to minimise: distance or time
        #[arg(long, default_value = "distance")]
        mode: CostMode,
        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },
    /// Intersections whose removal disconnects the network
    Aps {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Intersection closest to a coordinate
    Nearest {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Ignore nodes further away than this (km)
        #[arg(long)]
        max_km: Option<f64>,
    },
}

fn load(dir: &Path) -> Result<RoadNetwork> {
    let start = Instant::now();
    let network = load_from_dir(dir)
        .with_context(|| format!("failed to load road network from {}", dir.display()))?;
    log::info!("network loaded in {:.2}s", start.elapsed().as_secs_f64());
    Ok(network)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Route { data, from, to, mode, json } => {
            let network = load(&data)?;
            let adjacency = Adjacency::resolve(&network);
            let route = find_path(&network, &adjacency, NodeId(from), NodeId(to), mode)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&route)?);
                return Ok(());
            }
            for leg in &route.legs {
                println!("{:<40} {:>8.3} km", leg.name, leg.length);
            }
            match mode {
                CostMode::Distance => println!("Total distance: {:.3} km", route.total_cost),
                CostMode::Time => println!(
                    "Total time: {:.1} min over {:.3} km",
                    route.total_cost * 60.0,
                    route.length()
                ),
            }
        }
        Commands::Aps { data, json } => {
            let network = load(&data)?;
            let adjacency = Adjacency::resolve(&network);
            let start = Instant::now();
            let points = find_articulation_points(&network, &adjacency)?;
            log::info!("articulation search took {:.3}s", start.elapsed().as_secs_f64());

            if json {
                println!("{}", serde_json::to_string(&points)?);
            } else {
                for id in &points {
                    println!("{}", id.get());
                }
                println!("{} articulation points", points.len());
            }
        }
        Commands::Nearest { data, lat, lon, max_km } => {
            let network = load(&data)?;
            let location = Location::try_from_lat_lon(lat, lon)?;
            let found = match max_km {
                Some(radius) => network.nearest_within(location, radius),
                None => network.nearest_node(location),
            };
            match found.and_then(|id| network.describe_node(id)) {
                Some(text) => println!("{text}"),
                None => anyhow::bail!("no intersection near ({lat}, {lon})"),
            }
        }
    }

    Ok(())
}
