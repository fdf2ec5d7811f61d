//! greenmiles service entry point.

use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use greenmiles::api::{create_router, AppState};
use greenmiles::config::Config;
use greenmiles::geo::{chiang_mai_landmarks, haversine_m};
use greenmiles::metrics;
use greenmiles::utils::shutdown_signal;

/// Sustainable-tourism backend service.
#[derive(Parser, Debug)]
#[command(name = "greenmiles")]
#[command(about = "Eco-route comparison, Green Miles rewards, and geofenced check-ins")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// List the landmark geofences.
    Landmarks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("greenmiles=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Landmarks) => cmd_landmarks(),
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_serve(args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GREENMILES - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind: {}:{}", config.bind_addr, config.port);
    println!("  Miles per kg CO2: {}", config.miles_per_kg_co2);
    println!("  Check-in bonus: {} miles", config.checkin_bonus_miles);
    println!("  Ledger tail: {} entries", config.ledger_tail);
    println!("  Leaderboard cap: {}", config.leaderboard_max);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// List the landmark geofences with pairwise distances from Tha Phae Gate.
fn cmd_landmarks() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GREENMILES - LANDMARK GEOFENCES");
    println!("======================================================================");

    let landmarks = chiang_mai_landmarks();
    let gate = landmarks
        .iter()
        .find(|l| l.id == "tha-phae-gate")
        .map(|l| l.position);

    for landmark in landmarks {
        println!("  {} ({})", landmark.name, landmark.id);
        println!(
            "    center: {:.4},{:.4}  radius: {:.0}m",
            landmark.position.lat, landmark.position.lon, landmark.radius_m
        );
        if let Some(gate) = gate {
            println!(
                "    from Tha Phae Gate: {:.0}m",
                haversine_m(gate, landmark.position)
            );
        }
    }

    println!("======================================================================");

    Ok(())
}

/// Run the HTTP service.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Miles per kg CO2: {}", config.miles_per_kg_co2);
    info!("Check-in bonus: {} miles", config.checkin_bonus_miles);

    // Install metrics recorder
    let prometheus = metrics::install_recorder()?;
    metrics::init_metrics();

    // Create app state
    let app_state = AppState::from_config(&config).with_prometheus(prometheus);

    info!(
        "Loaded {} landmark geofences",
        app_state.geofence.landmarks().len()
    );

    // Bind and serve
    let ip: IpAddr = config.bind_addr.parse()?;
    let addr = SocketAddr::from((ip, config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());
    app_state.set_ready(true);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
