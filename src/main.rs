//! Application entry point: code timer host over stdio.
//!
//! The view process writes one JSON [`Command`] per line to our stdin and
//! reads one JSON [`Event`] per line from our stdout.  Logs go to stderr so
//! stdout stays a clean event stream.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create a single-threaded tokio runtime.
//! 4. Build the hint client ([`ApiClient`]) from config.
//! 5. Create the command and event channels.
//! 6. Spawn the [`ChannelBus`] and the stdout writer.
//! 7. Forward stdin lines to the bus until EOF, then tear the session down.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use code_timer::{
    config::AppConfig,
    hint::{ApiClient, TextGenerator},
    ChannelBus, Command, Event, EventSink,
};

// ---------------------------------------------------------------------------
// stdio bridge
// ---------------------------------------------------------------------------

/// Parse stdin lines into commands until EOF.  Malformed lines are logged
/// and skipped; they never end the session.
async fn read_commands(command_tx: mpsc::Sender<Command>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(line) {
            Ok(command) => {
                if command_tx.send(command).await.is_err() {
                    log::warn!("bus stopped, no longer reading commands");
                    break;
                }
            }
            Err(e) => log::warn!("ignoring malformed command ({e}): {line}"),
        }
    }

    log::info!("stdin closed, tearing down session");
    Ok(())
}

/// Write each event as one JSON line, flushing per event so the view sees
/// ticks as they happen.
async fn write_events(mut event_rx: mpsc::UnboundedReceiver<Event>) -> Result<()> {
    let mut stdout = tokio::io::stdout();

    while let Some(event) = event_rx.recv().await {
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("code timer host starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime: ticks, commands and hint completions all share one
    //    thread.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        // 4. Hint client
        let generator: Arc<dyn TextGenerator> = Arc::new(ApiClient::from_config(&config.hint));

        // 5. Channels
        let (command_tx, command_rx) = mpsc::channel::<Command>(16);
        let (sink, event_rx) = EventSink::channel();

        // 6. Bus + writer
        let mut bus = ChannelBus::new(&config, generator, sink);
        let bus_task = tokio::spawn(async move { bus.run(command_rx).await });
        let writer_task = tokio::spawn(write_events(event_rx));

        // 7. Reader (returns on EOF)
        read_commands(command_tx).await?;

        // Dropping the bus drops every EventSink, which ends the writer.
        bus_task.await?;
        writer_task.await??;

        log::info!("code timer host stopped");
        Ok::<(), anyhow::Error>(())
    })
}
