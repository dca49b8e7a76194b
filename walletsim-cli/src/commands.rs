//! Demo and shell front ends over a session store.

use crate::types::{parse_amount, CommandError, ShellCommand};
use anyhow::{bail, Result};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use walletsim::prelude::*;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Connect, split `amount` across `to`, optionally wait for every
/// resolution, then print the session.
pub async fn run_demo<L: LedgerBackend + 'static>(
    store: &SessionStore<L>,
    to: &str,
    amount: &str,
    wait: bool,
) -> Result<()> {
    let recipients = parse_recipients(to);
    if recipients.is_empty() {
        bail!("no recipients given");
    }
    let total = parse_amount(amount)?;
    let mut events = store.subscribe();

    println!("🔌 Connecting...");
    let connected = store.connect().await;
    drain(&mut events);
    connected?;

    println!("\n📤 Sending {total} ETH to {} recipient(s)", recipients.len());
    let report = store.send_split(&recipients, total).await;
    drain(&mut events);
    print_report(&report);

    if wait {
        println!("\n⏳ Waiting for {} transaction(s)...", store.pending_resolutions());
        while store.pending_resolutions() > 0 {
            tokio::time::sleep(POLL_INTERVAL).await;
            drain(&mut events);
        }
        drain(&mut events);
    }

    print_state(&store.snapshot());
    Ok(())
}

/// Interactive loop; notifications print as they arrive
pub async fn run_shell<L: LedgerBackend + 'static>(store: &SessionStore<L>) -> Result<()> {
    let mut events = store.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    prompt()?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<ShellCommand>() {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => execute(store, command).await,
                    Err(CommandError::Empty) => {}
                    Err(err) => println!("❌ {err}"),
                }
                drain(&mut events);
                prompt()?;
            }
            note = events.recv() => match note {
                Ok(note) => {
                    println!();
                    print_notification(&note);
                    prompt()?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notifications dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    println!("\nGoodbye! 👋");
    Ok(())
}

async fn execute<L: LedgerBackend + 'static>(store: &SessionStore<L>, command: ShellCommand) {
    // Failures are already reported through notifications.
    match command {
        ShellCommand::Connect => {
            let _ = store.connect().await;
        }
        ShellCommand::Send { recipients, amount } => {
            if let [to] = recipients.as_slice() {
                let _ = store.send_transaction(to, amount).await;
            } else {
                let report = store.send_split(&recipients, amount).await;
                print_report(&report);
            }
        }
        ShellCommand::Status => print_state(&store.snapshot()),
        ShellCommand::Disconnect => {
            let _ = store.disconnect();
        }
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
}

fn drain(events: &mut broadcast::Receiver<Notification>) {
    loop {
        match events.try_recv() {
            Ok(note) => print_notification(&note),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notifications dropped");
            }
            Err(_) => break,
        }
    }
}

fn print_notification(note: &Notification) {
    let icon = match note.severity {
        Severity::Success => "✅",
        Severity::Info => "ℹ️ ",
        Severity::Error => "❌",
    };
    println!("{icon} {}", note.message);
}

fn print_report(report: &BatchReport) {
    for (to, result) in &report.results {
        match result {
            Ok(id) => println!("   {} <- {} ETH  [{}]", shorten(to), report.share, id.short()),
            Err(err) => println!("   {} rejected: {err}", shorten(to)),
        }
    }
}

fn print_state(state: &SessionState) {
    println!("\n━━━ Session ━━━");
    match state.phase() {
        ConnectionPhase::Connected { address } => println!("Address:  {}", shorten(address)),
        ConnectionPhase::Connecting => println!("Address:  (connecting)"),
        ConnectionPhase::Disconnected => println!("Address:  (not connected)"),
    }
    println!("Balance:  {} ETH", state.balance_text());
    if state.is_loading() {
        println!("Loading:  yes");
    }
    if let Some(error) = state.error() {
        println!("Error:    {error}");
    }
    if state.history_len() == 0 {
        println!("History:  empty");
        return;
    }
    println!("History:");
    for tx in state.transactions() {
        println!(
            "  {:<8} {:>12} ETH -> {}  {}  {}",
            tx.status.to_string(),
            tx.amount.to_string(),
            shorten(&tx.to),
            shorten(tx.hash.as_str()),
            tx.timestamp.format("%H:%M:%S"),
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  connect                       connect the simulated wallet");
    println!("  send <to[,to...]> <amount>    send, split evenly across recipients");
    println!("  status                        show balance and history");
    println!("  disconnect                    reset the session");
    println!("  quit                          exit");
}

fn prompt() -> Result<()> {
    print!("walletsim> ");
    std::io::stdout().flush()?;
    Ok(())
}
