//! IJ portfolio backend API.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                 PORTFOLIO API                    │
//!                         │                                                  │
//!   serverless host event │  ┌──────────┐                                    │
//!   ──────────────────────┼─▶│ adapter  │──┐                                 │
//!                         │  └──────────┘  │   ┌──────────┐   ┌───────────┐  │
//!   `serve` listener      │                ├──▶│   http   │──▶│  routes   │  │
//!   ──────────────────────┼────────────────┤   │middleware│   └─────┬─────┘  │
//!                         │  ┌──────────┐  │   └──────────┘         │        │
//!   `dev` listener        │  │   dev    │──┘                        ▼        │
//!   ──────────────────────┼─▶│ (routing │                     ┌───────────┐  │
//!                         │  │descriptor)                     │  storage  │  │
//!                         │  └──────────┘                     └───────────┘  │
//!                         │                                                  │
//!                         │  config · lifecycle · observability              │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use portfolio_api::adapter::Adapter;
use portfolio_api::config::{load_config, AppConfig};
use portfolio_api::dev::DevHost;
use portfolio_api::http::HttpServer;
use portfolio_api::lifecycle::{build_context, signals, Shutdown};
use portfolio_api::observability::{logging, metrics};
use portfolio_api::routing::{load_descriptor, DescriptorRouter};

#[derive(Parser)]
#[command(name = "portfolio-api")]
#[command(about = "IJ portfolio backend API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "PORTFOLIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the application directly (default)
    Serve,
    /// Serve through the routing descriptor, as the platform would
    Dev {
        /// Routing descriptor; defaults to `descriptor.path` from config
        #[arg(short, long)]
        descriptor: Option<PathBuf>,
    },
    /// Validate configuration and routing descriptor
    Check {
        #[arg(short, long)]
        descriptor: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, None).await,
        Commands::Dev { descriptor } => {
            let path = descriptor.unwrap_or_else(|| config.descriptor.path.clone());
            serve(config, Some(path)).await
        }
        Commands::Check { descriptor } => {
            let path = descriptor.unwrap_or_else(|| config.descriptor.path.clone());
            check(&config, path)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            ExitCode::FAILURE
        }
    }
}

async fn serve(
    config: AppConfig,
    descriptor: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("portfolio-api v{} starting", env!("CARGO_PKG_VERSION"));

    // Fail on a bad descriptor before touching the database.
    let routes = match &descriptor {
        Some(path) => Some(DescriptorRouter::compile(load_descriptor(path)?)?),
        None => None,
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let entry = config.descriptor.entry.clone();
    let context = build_context(config).await?;

    tracing::info!(
        address = %listener.local_addr()?,
        database = context.store.is_connected(),
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    match routes {
        Some(routes) => {
            let adapter = Adapter::from_context(context);
            DevHost::new(routes, adapter, entry)
                .run(listener, server_shutdown)
                .await?
        }
        None => HttpServer::new(context).run(listener, server_shutdown).await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: &AppConfig, descriptor: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = load_descriptor(&descriptor)?;
    let routes = DescriptorRouter::compile(descriptor)?;

    println!("configuration: ok");
    println!(
        "descriptor: version {}, {} build(s), {} route(s)",
        routes.descriptor().version,
        routes.descriptor().builds.len(),
        routes.descriptor().routes.len()
    );

    let entry = &config.descriptor.entry;
    if routes.descriptor().build(entry).is_none() {
        return Err(format!("no build in descriptor has src '{}'", entry).into());
    }

    let reaches_entry = routes
        .resolve(&axum::http::Method::GET, "/")
        .and_then(|r| r.build)
        .is_some_and(|b| b.trim_start_matches('/') == entry.trim_start_matches('/'));
    println!(
        "GET / {} {}",
        if reaches_entry { "→" } else { "does not reach" },
        entry
    );

    Ok(())
}
