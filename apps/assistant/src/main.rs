use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, ClientEvent, Workflow};
use shared::domain::SearchResultItem;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{broadcast, mpsc, Mutex},
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{parse_command, to_action, Command, HELP};

#[derive(Parser, Debug)]
#[command(about = "Dual NAMASTE / ICD-11 coding assistant")]
struct Args {
    /// Settings file; defaults to ./assistant.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(v) = args.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = args.token {
        settings.bearer_token = v;
    }
    if let Some(v) = args.debounce_ms {
        settings.debounce_ms = v;
    }
    settings.validate()?;
    info!(api_base_url = %settings.api_base_url, "assistant: starting");

    let workflow = Workflow::from_settings(&settings);
    let events = workflow.subscribe_events();
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let runner = tokio::spawn(workflow.run(cmd_rx));

    let displayed: Arc<Mutex<Vec<SearchResultItem>>> = Arc::new(Mutex::new(Vec::new()));
    let printer = tokio::spawn(print_events(events, Arc::clone(&displayed)));

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(reason) => {
                println!("{reason}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            command => {
                let action = {
                    let displayed = displayed.lock().await;
                    to_action(command, &displayed)
                };
                match action {
                    Ok(Some(action)) => {
                        if cmd_tx.send(action).await.is_err() {
                            warn!("assistant: workflow stopped; exiting");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(reason) => println!("{reason}"),
                }
            }
        }
    }

    drop(cmd_tx);
    runner.await.context("workflow task failed")?;
    printer.abort();
    Ok(())
}

async fn print_events(
    mut events: broadcast::Receiver<ClientEvent>,
    displayed: Arc<Mutex<Vec<SearchResultItem>>>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "assistant: renderer fell behind");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        match &event {
            ClientEvent::ResultsUpdated(results) => {
                *displayed.lock().await = results.source.clone();
            }
            ClientEvent::ResultsCleared => displayed.lock().await.clear(),
            ClientEvent::StateChanged { from, to } => {
                debug!(from = ?from, to = ?to, "assistant: state changed")
            }
            _ => {}
        }

        if let Some(text) = render::render_event(&event) {
            println!("{text}");
        }
    }
}
