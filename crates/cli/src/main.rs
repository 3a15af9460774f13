//! Relay CLI - Command-line interface for the relay daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use relay_sdk::{QueueStats, RelayClient, SdkError};
use std::time::Duration;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay message broker CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "RELAY_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Put a message onto a queue (the queue is created on first use)
    Put {
        /// Queue name
        queue: String,

        /// Message content
        message: String,
    },

    /// Take the oldest message from a queue, waiting if it is empty
    Get {
        /// Queue name
        queue: String,

        /// Seconds to wait for a message (daemon default if omitted)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Show broker status
    Stats,
}

#[derive(Tabled)]
struct QueueRow {
    queue: String,
    stored: usize,
    waiting: usize,
    limit: String,
}

impl From<QueueStats> for QueueRow {
    fn from(q: QueueStats) -> Self {
        Self {
            queue: q.name,
            stored: q.stored_messages,
            waiting: q.waiting_consumers,
            limit: limit_label(q.max_messages),
        }
    }
}

fn limit_label(limit: usize) -> String {
    if limit == 0 {
        "unlimited".to_string()
    } else {
        limit.to_string()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RelayClient::connect(&cli.rpc_url)
        .await
        .context("Failed to connect to daemon")?;

    match cli.command {
        Commands::Put { queue, message } => {
            let response = client.put(&queue, &message).await?;

            let how = if response.delivered {
                "handed to a waiting consumer"
            } else {
                "stored"
            };
            println!(
                "{}",
                format!("✓ Message put on '{}' ({})", response.queue, how)
                    .green()
                    .bold()
            );
        }

        Commands::Get { queue, timeout } => {
            match client.get(&queue, timeout.map(Duration::from_secs)).await {
                Ok(response) => println!("{}", response.message),
                Err(SdkError::NotFound(reason)) => {
                    eprintln!("{} {}", "✗".red(), reason);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Stats => {
            println!("{}", "Broker Status".cyan().bold());
            println!();

            match client.stats().await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!(
                        "  {} {} / {}",
                        "Queues:".bold(),
                        stats.queue_count,
                        limit_label(stats.max_queues)
                    );
                    println!("  {} {} seconds", "Uptime:".bold(), stats.uptime_seconds);

                    if !stats.queues.is_empty() {
                        println!();
                        let rows: Vec<QueueRow> =
                            stats.queues.into_iter().map(QueueRow::from).collect();
                        println!("{}", Table::new(rows));
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
