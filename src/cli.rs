use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use crate::credentials::CredentialSource;
use crate::logging::Verbosity;
use crate::types::{DEFAULT_TRACKER_URL, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "relish-notifier")]
#[command(about = "Watch a Relish order and notify when it arrives", long_about = None)]
pub struct Cli {
    /// Run Chrome in headless mode (default)
    #[arg(long, overrides_with = "no_headless")]
    pub headless: bool,

    /// Do not run Chrome in headless mode (show browser window)
    #[arg(long, overrides_with = "headless")]
    pub no_headless: bool,

    /// Enable browser extensions (default)
    #[arg(long, overrides_with = "no_extensions")]
    pub extensions: bool,

    /// Disable browser extensions
    #[arg(long, overrides_with = "extensions")]
    pub no_extensions: bool,

    /// Page timeout in seconds
    #[arg(short = 't', long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub page_timeout: u64,

    /// How often to check for delivery, in seconds
    #[arg(short = 'i', long = "check-interval", default_value = "30")]
    pub interval: u64,

    /// Check once and exit
    #[arg(long)]
    pub once: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run this command when your order has arrived
    #[arg(short, long)]
    pub command: Option<String>,

    /// Where to read the tracker login from
    #[arg(long, value_enum, default_value = "keyring")]
    pub credentials: CredentialSource,

    /// Tracker page to log into and watch
    #[arg(long, default_value = DEFAULT_TRACKER_URL)]
    pub tracker_url: String,

    /// Use this WebDriver instead of finding or starting chromedriver
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

impl Cli {
    /// Validate and freeze the run settings
    pub fn into_config(self) -> Result<RunConfig> {
        url::Url::parse(&self.tracker_url)
            .with_context(|| format!("Invalid tracker URL: {}", self.tracker_url))?;

        if let Some(webdriver_url) = &self.webdriver_url {
            url::Url::parse(webdriver_url)
                .with_context(|| format!("Invalid WebDriver URL: {}", webdriver_url))?;
        }

        Ok(RunConfig {
            headless: !self.no_headless,
            extensions: !self.no_extensions,
            page_timeout: Duration::from_secs(self.page_timeout),
            interval: Duration::from_secs(self.interval),
            once: self.once,
            command: self.command.filter(|c| !c.trim().is_empty()),
            verbosity: Verbosity::from_count(self.verbose),
            tracker_url: self.tracker_url,
            webdriver_url: self.webdriver_url,
        })
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;
