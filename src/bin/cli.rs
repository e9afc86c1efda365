//! Interactive command-line interface for donna.
//!
//! Runs the REPL on the foreground task and the reminder loop in the
//! background. Reminders arrive over a channel and are printed between
//! prompts; the two sides share nothing but the task store file.

use donna::commands::{Command, GOODBYE, Tracker};
use donna::notify::ChannelNotifier;
use donna::{DonnaConfig, JsonTaskStore, ReminderService};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to watch the reminder loop.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("donna=info")),
        )
        .init();

    let config = DonnaConfig::load();
    let store = Arc::new(JsonTaskStore::new(config.store_path.clone()));
    let tracker = Tracker::new(store.clone());

    let (note_tx, mut note_rx) = tokio::sync::mpsc::unbounded_channel();
    let service = ReminderService::new(store, Arc::new(ChannelNotifier::new(note_tx)))
        .with_ceiling(Duration::from_secs(config.poll_ceiling_secs))
        .with_toast_duration(config.toast_duration_secs);
    let cancel = service.cancel_token();
    let loop_handle = service.run();

    // Print reminders as the background loop delivers them.
    tokio::spawn(async move {
        while let Some(note) = note_rx.recv().await {
            println!("\n[{}] {}", note.title, note.body);
            prompt();
        }
    });

    // Ctrl+C ends the session like `exit`.
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down...");
            cancel_on_signal.cancel();
        }
    });

    println!("Welcome to DONNA, your sassy task assistant. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        tokio::select! {
            () = cancel.cancelled() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Exit) => {
                        println!("{GOODBYE}");
                        break;
                    }
                    Ok(command) => match tracker.execute(&command) {
                        Ok(reply) => println!("{reply}"),
                        Err(e) => println!("Something went wrong: {e}"),
                    },
                    Err(hint) => println!("{hint}"),
                }
            }
        }
    }

    cancel.cancel();
    let _ = loop_handle.await;
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
