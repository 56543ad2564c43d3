//! surged — the Surge daemon.
//!
//! Single binary with two jobs:
//! - `serve`: run the load-generating HTTP service
//! - `plan`: validate a provisioning plan and print it in
//!   dependency order
//!
//! # Usage
//!
//! ```text
//! surged serve --port 8000
//! surged plan --file plans/loadgen.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing::info;

use surge_api::{ApiState, build_router};
use surge_load::LoadLimits;
use surge_provision::ProvisionPlan;

#[derive(Parser)]
#[command(name = "surged", about = "Surge daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the load-generating HTTP service.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Maximum CPU burn iterations per request.
        #[arg(long, default_value = "1000000")]
        max_iterations: u64,

        /// Maximum ballast size per request, in megabytes.
        #[arg(long, default_value = "4096")]
        max_memory_mb: u64,
    },

    /// Validate a provisioning plan and print it in dependency order.
    Plan {
        /// Path to the plan file.
        #[arg(long)]
        file: PathBuf,

        /// Epoch seconds to validate scheduled actions against
        /// (defaults to the current time).
        #[arg(long)]
        at_epoch: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,surged=debug,surge=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            max_iterations,
            max_memory_mb,
        } => {
            let limits = LoadLimits {
                max_iterations,
                max_memory_mb,
            };
            run_serve(port, limits).await
        }
        Command::Plan { file, at_epoch } => run_plan(&file, at_epoch),
    }
}

async fn run_serve(port: u16, limits: LoadLimits) -> anyhow::Result<()> {
    let state = ApiState::new(limits);
    let router = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, ?limits, "load service starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
    });

    server.await?;

    info!("load service stopped");
    Ok(())
}

fn run_plan(file: &PathBuf, at_epoch: Option<u64>) -> anyhow::Result<()> {
    let plan = ProvisionPlan::from_file(file)?;
    let now_epoch = at_epoch.unwrap_or_else(epoch_secs);

    plan.validate(now_epoch)?;
    let ordered = plan.ordered()?;

    info!(
        resources = ordered.len(),
        now_epoch,
        "plan validated"
    );
    println!("{}", serde_json::to_string_pretty(&ordered)?);
    Ok(())
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
