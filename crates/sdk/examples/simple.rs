//! Simple SDK Example
//!
//! Producer/consumer handoff against a running daemon.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package relay-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use relay_sdk::RelayClient;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Relay SDK - Simple Example");
    println!("==========================\n");

    println!("1. Connecting to daemon...");
    let client = RelayClient::connect("http://127.0.0.1:8080").await?;
    println!("   ✓ Connected\n");

    // Gets never create queues: make sure 'demo' exists and is empty
    println!("2. Preparing queue 'demo'...");
    client.put("demo", "seed").await?;
    while client.get("demo", Some(Duration::ZERO)).await.is_ok() {}
    println!("   ✓ Ready\n");

    println!("3. Starting a consumer on 'demo'...");
    let consumer = {
        let client = RelayClient::connect(client.url()).await?;
        tokio::spawn(async move { client.get("demo", Some(Duration::from_secs(10))).await })
    };
    while !client
        .stats()
        .await?
        .queues
        .iter()
        .any(|q| q.name == "demo" && q.waiting_consumers > 0)
    {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    println!("4. Putting a message...");
    let put = client.put("demo", "hello from simple.rs").await?;
    println!("   ✓ Delivered directly: {}\n", put.delivered);

    let got = consumer.await??;
    println!("5. Consumer received: {}\n", got.message);

    let stats = client.stats().await?;
    println!("6. Broker holds {} queue(s)", stats.queue_count);

    Ok(())
}
