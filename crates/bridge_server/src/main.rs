//! # bridge_server
//!
//! The authoritative bridge server. It owns the simulated world, applies
//! crew commands arriving on NATS once per tick, and publishes each player
//! ship's state back to its crew.
//!
//! ## Startup Sequence
//!
//! 1. Load the simulation config and the optional scenario file.
//! 2. Connect to NATS (default `nats://localhost:4222`).
//! 3. Subscribe to `{prefix}.ship.*.command`.
//! 4. Enter the fixed-timestep tick loop until Ctrl-C or `--max-ticks`.

mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bridge_net::NatsConnection;
use bridge_net::connection::DEFAULT_NATS_URL;
use bridge_net::subjects::DEFAULT_PREFIX;
use bridge_sim::{Scenario, SimConfig, TickConfig, TickLoop, World};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::Server;

#[derive(Debug, Parser)]
#[command(name = "bridge_server", about = "Authoritative player-ship simulation over NATS")]
struct Args {
    /// NATS server URL
    #[arg(short, long, default_value = DEFAULT_NATS_URL)]
    nats_url: String,

    /// NATS subject prefix
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// JSON simulation config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON scenario to populate the world with
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the configured tick rate
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Stop after this many ticks (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Seed for self-destruct codes and other random draws
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "bridge_server=info,bridge_sim=info".into()),
        )
        .init();

    let args = Args::parse();
    info!("bridge server starting");

    let tick_loop = build_tick_loop(&args)?;

    let conn = NatsConnection::connect_to(&args.nats_url).await?;

    let server = Server::new(conn, args.prefix, tick_loop);
    server.run().await?;

    info!("bridge server shut down");
    Ok(())
}

/// Assemble the world from the command line.
fn build_tick_loop(args: &Args) -> Result<TickLoop> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(rate) = args.tick_rate {
        config = config.with_tick_rate(rate);
    }
    config.validate()?;

    let tick_config = TickConfig {
        max_ticks: args.max_ticks,
        ..TickConfig::from_sim(&config)
    };

    let mut world = match args.seed {
        Some(seed) => World::with_seed(config, seed),
        None => World::new(config),
    };

    if let Some(path) = &args.scenario {
        let scenario = Scenario::load(path).with_context(|| format!("loading scenario {}", path.display()))?;
        let spawned = scenario.populate(&mut world)?;
        info!(
            scenario = %path.display(),
            objects = spawned.len(),
            player_ships = world.player_ships().len(),
            "scenario loaded"
        );
    }

    Ok(TickLoop::new(tick_config, world))
}
