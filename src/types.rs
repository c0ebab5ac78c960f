use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::logging::Verbosity;
use crate::session::Selector;
use crate::status::OrderStatus;

/// Default page the tracker lives on
pub const DEFAULT_TRACKER_URL: &str = "https://relish.ezcater.com/schedule";

/// Tracker login, as a username/password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Both parts must be non-empty
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Credentials { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Addresses of everything the notifier touches on the tracker page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerPage {
    /// Login/schedule page; shows the status label once logged in
    pub url: String,
    pub username_field: Selector,
    pub username_submit: Selector,
    pub password_field: Selector,
    pub password_submit: Selector,
    pub status_label: Selector,
}

impl Default for TrackerPage {
    fn default() -> Self {
        TrackerPage {
            url: DEFAULT_TRACKER_URL.to_string(),
            username_field: Selector::id("identity_email"),
            username_submit: Selector::name("commit"),
            password_field: Selector::id("password"),
            password_submit: Selector::name("action"),
            status_label: Selector::class("schedule-card-label"),
        }
    }
}

impl TrackerPage {
    pub fn with_url(url: impl Into<String>) -> Self {
        TrackerPage {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Settings fixed for the whole run
#[derive(Clone, Debug, Serialize)]
pub struct RunConfig {
    /// Run Chrome without a window
    pub headless: bool,
    /// Leave browser extensions enabled
    pub extensions: bool,
    /// Bound on element waits and page loads
    pub page_timeout: Duration,
    /// Delay between status checks
    pub interval: Duration,
    /// Check once and report failure if not arrived
    pub once: bool,
    /// Shell command to run on arrival
    pub command: Option<String>,
    pub verbosity: Verbosity,
    /// Tracker page URL
    pub tracker_url: String,
    /// Use this WebDriver instead of locating or starting chromedriver
    pub webdriver_url: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            headless: true,
            extensions: true,
            page_timeout: Duration::from_secs(10),
            interval: Duration::from_secs(30),
            once: false,
            command: None,
            verbosity: Verbosity::Warning,
            tracker_url: DEFAULT_TRACKER_URL.to_string(),
            webdriver_url: None,
        }
    }
}

/// Step of the login form that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginStage {
    Navigate,
    Username,
    Password,
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            LoginStage::Navigate => "navigate",
            LoginStage::Username => "username",
            LoginStage::Password => "password",
        };
        f.write_str(stage)
    }
}

/// How a monitoring run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The order arrived on the given check (1-based)
    Arrived { checks: u64 },
    /// Single-shot mode saw a status other than arrived
    NotArrived { status: OrderStatus },
    /// Stopped by an interrupt
    Cancelled,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
