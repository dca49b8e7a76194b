//! Multi-Recipient Transfer Example
//!
//! Connects to the simulated wallet, splits a transfer across three
//! recipients and waits for every transaction to resolve.
//!
//! Run with:
//! ```bash
//! RUST_LOG=walletsim=debug cargo run -p walletsim --example multi_recipient
//! ```

use std::time::Duration;
use walletsim::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = SessionStore::new(MockLedger::new(LedgerConfig::default())?);
    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(note) = events.recv().await {
            println!("  {note}");
        }
    });

    println!("━━━ Connecting ━━━");
    let address = store.connect().await?;
    let state = store.snapshot();
    println!("Address: {}", shorten(&address));
    println!("Balance: {} ETH\n", state.balance_text());

    let recipients = parse_recipients(
        "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA, \
         0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB, \
         0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
    );
    let total: Amount = "0.3".parse()?;

    println!("━━━ Sending {total} ETH to {} recipients ━━━", recipients.len());
    let report = store.send_split(&recipients, total).await;
    for (to, result) in &report.results {
        match result {
            Ok(id) => println!("{} <- {} ETH ({})", shorten(to), report.share, id.short()),
            Err(err) => println!("{} rejected: {err}", shorten(to)),
        }
    }

    while store.pending_resolutions() > 0 {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    println!("\n━━━ History ━━━");
    let state = store.snapshot();
    for tx in state.transactions() {
        println!(
            "{:<8} {} ETH -> {}  {}",
            tx.status.to_string(),
            tx.amount,
            shorten(&tx.to),
            tx.timestamp.format("%H:%M:%S")
        );
    }
    println!("Balance: {} ETH", state.balance_text());

    store.disconnect()?;
    Ok(())
}
