//! Relay daemon - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay_api_rpc::{RpcServer, RpcServerConfig};
use relay_core::application::BrokerConfig;
use relay_infra_memory::in_memory_service;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "relayd", version, about = "Relay message broker daemon")]
struct Args {
    /// Address to bind the JSON-RPC server to
    #[arg(long, env = "RELAY_RPC_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the JSON-RPC server
    #[arg(long, env = "RELAY_RPC_PORT", default_value_t = 8080)]
    port: u16,

    /// Maximum number of queues (0 = unlimited)
    #[arg(long, env = "RELAY_MAX_QUEUES", default_value_t = 0)]
    max_queues: usize,

    /// Maximum stored messages per queue (0 = unlimited)
    #[arg(long, env = "RELAY_MAX_MESSAGES", default_value_t = 0)]
    max_messages: usize,

    /// Wait applied to gets that do not name one, in seconds
    #[arg(long, env = "RELAY_WAIT_TIMEOUT", default_value_t = 86_400)]
    wait_timeout: u64,

    #[arg(long, env = "RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl Args {
    fn broker_config(&self) -> BrokerConfig {
        BrokerConfig {
            max_queues: self.max_queues,
            max_messages: self.max_messages,
            default_wait_timeout: Duration::from_secs(self.wait_timeout),
        }
    }
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("relay=info"))
        .context("Failed to create env filter")?;

    let installed = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .try_init(),
    };
    installed.context("Failed to install tracing subscriber")
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.context("Failed to listen for Ctrl+C")?,
            _ = term.recv() => {}
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format)?;

    info!("Relay v{} starting...", VERSION);

    let config = args.broker_config();
    config.validate().context("Invalid broker configuration")?;
    info!(
        max_queues = config.max_queues,
        max_messages = config.max_messages,
        wait_timeout_secs = config.default_wait_timeout.as_secs(),
        "Broker configured"
    );

    let service = Arc::new(in_memory_service(&config));

    let rpc_config = RpcServerConfig {
        host: args.host.clone(),
        port: args.port,
    };
    let (addr, handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "Relay ready. Press Ctrl+C to shutdown");

    shutdown_signal().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // Already-stopped is not an error here
    let _ = handle.stop();
    if tokio::time::timeout(SHUTDOWN_GRACE, handle.stopped())
        .await
        .is_err()
    {
        warn!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "RPC server did not stop within grace period"
        );
    }

    info!("Shutdown complete.");
    Ok(())
}
