#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use tokio::signal;
use tracing::{debug, info};

use relish_notifier::cli::Cli;
use relish_notifier::errors::NotifierError;
use relish_notifier::{
    Browser, CommandArrival, DriverManager, Notifier, PollOutcome, RunConfig, TrackerPage,
    logging,
};

// Exit codes
const EXIT_SUCCESS: i32 = 0;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let drivers = DriverManager::new();
    let result = run(&drivers).await;

    // Always clean up chromedriver processes before exiting
    drivers.stop_all();

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run(drivers: &DriverManager) -> Result<(), NotifierError> {
    let cli = Cli::parse();
    let source = cli.credentials;
    let config = cli.into_config()?;

    logging::init(config.verbosity);
    debug!(
        "Run configuration: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );

    // Credentials are checked before any browser is started
    let provider = source.provider();
    let credentials = provider.credentials()?;
    info!("Loaded credentials from {}", provider.describe());

    // One interrupt future for the whole run; startup is cancellable too
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let browser = tokio::select! {
        biased;
        _ = &mut shutdown => {
            info!("Interrupted during startup, shutting down");
            return Ok(());
        }
        browser = start_browser(drivers, &config) => browser?,
    };

    let notifier = Notifier::new(
        browser,
        CommandArrival::new(config.command.clone()),
        credentials,
        TrackerPage::with_url(config.tracker_url.clone()),
        config,
    );

    match notifier.run(shutdown).await? {
        PollOutcome::Arrived { .. } | PollOutcome::Cancelled => Ok(()),
        PollOutcome::NotArrived { status } => Err(NotifierError::NotArrived(status)),
    }
}

async fn start_browser(drivers: &DriverManager, config: &RunConfig) -> anyhow::Result<Browser> {
    let webdriver_url = drivers.ensure_driver(config.webdriver_url.as_deref()).await?;
    Browser::launch(config, &webdriver_url).await
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            // No handler means no interrupt can be delivered; never resolve
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
