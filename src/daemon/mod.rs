//! Daemon module for the pomodoro timer.
//!
//! This module contains the core daemon functionality:
//! - `timer`: Timer engine owning the clock, settings and draft
//! - `ipc`: Unix socket server and request dispatch
//! - [`run`]: wiring of the ticker, the socket and shutdown

pub mod ipc;
pub mod timer;

pub use ipc::{IpcError, IpcServer, RequestHandler};
pub use timer::{TimerEngine, TimerEvent};

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::settings::{FileStore, SettingsStore};
use crate::types::DaemonConfig;

/// Period of the countdown ticker.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Runs the daemon until Ctrl-C.
///
/// Loads settings from `config.settings_path`, binds `config.socket_path`
/// and serves one request per connection while the ticker drives the
/// engine once per second.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound or accepting fails.
pub async fn run(config: &DaemonConfig) -> Result<()> {
    let settings = SettingsStore::load(Box::new(FileStore::open(&config.settings_path)));
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = Arc::new(Mutex::new(TimerEngine::new(settings, event_tx)));

    let server = IpcServer::new(&config.socket_path)?;
    let handler = Arc::new(RequestHandler::new(engine.clone()));
    tracing::info!("Daemon listening on {:?}", server.socket_path());

    tokio::spawn(log_events(event_rx));
    let ticker = tokio::spawn(run_ticker(engine, TICK_PERIOD));

    let result = loop {
        tokio::select! {
            accepted = server.accept() => {
                let stream = match accepted {
                    Ok(stream) => stream,
                    Err(e) => break Err(e),
                };
                let handler = handler.clone();
                tokio::spawn(async move {
                    if let Err(e) = ipc::serve_connection(stream, &handler).await {
                        tracing::debug!("Connection ended with error: {:#}", e);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break Ok(());
            }
        }
    };

    ticker.abort();
    result
}

/// Drives `engine` once per `period`.
///
/// The first firing happens one period after start. Firings missed while
/// the engine lock was held are skipped rather than replayed.
pub async fn run_ticker(engine: Arc<Mutex<TimerEngine>>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        engine.lock().await.on_tick();
    }
}

async fn log_events(mut event_rx: mpsc::UnboundedReceiver<TimerEvent>) {
    while let Some(event) = event_rx.recv().await {
        match event {
            TimerEvent::Tick { .. } => tracing::trace!("{:?}", event),
            TimerEvent::CycleCompleted => {
                tracing::info!("Full cycle complete, waiting for restart")
            }
            other => tracing::debug!("{:?}", other),
        }
    }
}
