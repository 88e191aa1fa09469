//! Pomocycle - a pomodoro timer daemon and CLI
//!
//! This tool cycles through the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tokio::time::{interval, Duration, MissedTickBehavior};

use pomocycle::cli::{Cli, Commands, Display, IpcClient, SettingsCommand};
use pomocycle::daemon;
use pomocycle::types::{DaemonConfig, IpcRequest, IpcResponse, Mode};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Cli {
        command,
        socket,
        settings,
        ..
    } = cli;
    let Some(command) = command else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let resolve = || -> Result<DaemonConfig> {
        let config = DaemonConfig::resolve(socket.clone(), settings.clone())?;
        tracing::debug!("Using {:?}", config);
        Ok(config)
    };
    let connect =
        || -> Result<IpcClient> { Ok(IpcClient::with_socket_path(resolve()?.socket_path)) };

    match command {
        Commands::Daemon => daemon::run(&resolve()?).await?,
        Commands::Toggle => Display::show_response(&connect()?.toggle().await?),
        Commands::Status => Display::show_response(&connect()?.status().await?),
        Commands::Watch => watch(&connect()?.with_max_retries(1)).await?,
        Commands::Settings(action) => {
            let response = connect()?.send(&action.to_request()).await?;
            if action == SettingsCommand::Show {
                show_settings(&response);
            } else {
                Display::show_response(&response);
            }
        }
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

/// Polls the daemon once per second until Ctrl-C.
async fn watch(client: &IpcClient) -> Result<()> {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let response = client.send(&IpcRequest::Status).await?;
                if let Some(snapshot) = response.data.and_then(|data| data.snapshot) {
                    Display::show_watch_frame(&snapshot);
                }
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// Shows the live settings carried by a status response, plus any draft.
fn show_settings(response: &IpcResponse) {
    let Some(data) = &response.data else {
        return;
    };
    if let Some(durations) = &data.durations {
        println!("Live settings");
        for mode in Mode::ALL {
            println!("  {:<12} {:>2} min", mode.label(), durations.minutes(mode));
        }
    }
    if let Some(snapshot) = &data.snapshot {
        println!("  {:<12} {}", "font", snapshot.font.as_str());
        println!("  {:<12} {}", "color", snapshot.accent_color.as_str());
    }
    match &data.pending {
        Some(pending) => println!("\n{}", Display::render_pending(pending)),
        None => println!("\nNo open settings draft"),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
