//! # relish-notifier
#![allow(clippy::uninlined_format_args)]
//!
//! Watches a Relish (ezCater) order tracker in a Chrome session and tells you
//! when lunch has arrived.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Store the tracker login in the OS keyring once
//! # (service "relish-notifier", accounts "EMAIL" and "PASSWORD")
//!
//! # Poll every 30 seconds until the order arrives
//! relish-notifier
//!
//! # Ring a bell when it does
//! relish-notifier --command 'notify-send "Lunch is here"'
//!
//! # Single check; exits non-zero if the order has not arrived yet
//! relish-notifier --once
//!
//! # Watch it happen, with debug logs
//! relish-notifier --no-headless -vv
//!
//! # Credentials from RELISH_EMAIL / RELISH_PASSWORD instead of the keyring
//! relish-notifier --credentials env
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use relish_notifier::{
//!     Browser, CommandArrival, Credentials, DriverManager, Notifier, RunConfig, TrackerPage,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RunConfig::default();
//! let drivers = DriverManager::new();
//! let url = drivers.ensure_driver(None).await?;
//! let browser = Browser::launch(&config, &url).await?;
//!
//! let credentials = Credentials::new("me@example.com", "secret").unwrap();
//! let notifier = Notifier::new(
//!     browser,
//!     CommandArrival::new(None),
//!     credentials,
//!     TrackerPage::default(),
//!     config,
//! );
//! let outcome = notifier.run(std::future::pending()).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

/// Arrival notice and user command
pub mod arrival;

/// Command line surface
pub mod cli;

/// Tracker login lookup
pub mod credentials;

/// Error types with exit codes
pub mod errors;

/// Subscriber setup and verbosity levels
pub mod logging;

/// Two-step login form
pub mod login;

/// The polling state machine
pub mod notifier;

/// Browser session capability
pub mod session;

/// Order status classification
pub mod status;

/// Shared value types
pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// Automatic chromedriver process management
pub mod webdriver_manager;

pub use arrival::{ArrivalHandler, CommandArrival};
pub use credentials::{CredentialError, CredentialProvider, CredentialSource, EnvStore, KeyringStore};
pub use errors::{LoginFailure, NotifierError};
pub use login::login;
pub use notifier::Notifier;
pub use session::{Selector, Session, SessionError};
pub use status::{OrderStatus, classify};
pub use types::{Credentials, LoginStage, PollOutcome, RunConfig, TrackerPage};
pub use webdriver::Browser;
pub use webdriver_manager::DriverManager;
