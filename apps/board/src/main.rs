use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    refresh_channel, run_poll_loop, BoardClient, BoardSink, SelectedFile, StatusBoard,
    StatusPoller, UploadBanner, UploadController, UploadPhase,
};
use tracing::info;

mod config;

#[derive(Parser, Debug)]
#[command(name = "board", about = "Redirection-schedule status board client")]
struct Args {
    /// Base URL of the schedule server, e.g. http://gsm-gateway:8080
    #[arg(long)]
    server_url: Option<String>,

    /// Seconds between status polls in watch mode
    #[arg(long)]
    poll_interval_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the server and keep the board on screen
    Watch,
    /// Replace the schedule file on the server
    Upload { path: PathBuf },
    /// Save the schedule file currently held by the server
    Download { path: PathBuf },
}

struct TerminalSink;

impl BoardSink for TerminalSink {
    fn board_updated(&self, board: &StatusBoard) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        let indicator = if board.active_indicator { "●" } else { "○" };
        println!("[{stamp}] {indicator} Aktualne:  {}", board.current_slot);
        println!("[{stamp}]   Następne:  {}", board.next_slot);
    }

    fn banner_updated(&self, banner: &UploadBanner) {
        if banner.visible {
            println!("{}", banner.text);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(secs) = args.poll_interval_secs {
        if secs > 0 {
            settings.poll_interval_secs = secs;
        }
    }

    let client = BoardClient::new(settings.server_url.clone())?;

    match args.command {
        Command::Watch => {
            info!(
                server_url = %settings.server_url,
                interval_secs = settings.poll_interval_secs,
                "starting status board"
            );
            let (refresh_handle, refresh_rx) = refresh_channel();
            let poller = StatusPoller::new(client, TerminalSink);
            // Held for the whole run: the loop stops once every handle is gone.
            let _refresh_handle = refresh_handle;
            run_poll_loop(
                poller,
                refresh_rx,
                Duration::from_secs(settings.poll_interval_secs),
            )
            .await;
        }
        Command::Upload { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("schedule.xlsx")
                .to_string();

            let (refresh_handle, mut refresh_rx) = refresh_channel();
            let mut controller =
                UploadController::new(client.clone(), refresh_handle, TerminalSink);
            controller
                .submit_file(Some(SelectedFile { name, bytes }))
                .await;

            if controller.banner().phase != UploadPhase::Success {
                bail!("schedule upload failed");
            }

            // The success signal the web board uses to bypass its poll timer;
            // here it drives one immediate board render before exiting.
            if refresh_rx.recv().await.is_some() {
                let mut poller = StatusPoller::new(client, TerminalSink);
                poller.refresh().await;
            }
        }
        Command::Download { path } => {
            let bytes = client.download_schedule().await?;
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("Zapisano {} bajtów do {}", bytes.len(), path.display());
        }
    }

    Ok(())
}
