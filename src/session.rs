use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// How an element on the tracker page is addressed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Match by `id` attribute
    Id(String),
    /// Match by `name` attribute
    Name(String),
    /// Match by a single CSS class
    Class(String),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Selector::Name(name.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Selector::Class(class.into())
    }

    /// Render as a CSS selector
    pub fn css(&self) -> String {
        match self {
            Selector::Id(id) => format!("#{}", id),
            Selector::Name(name) => format!("[name='{}']", name),
            Selector::Class(class) => format!(".{}", class),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// Failure reported by a browser session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A bounded wait or page load ran out of time
    #[error("timed out: {0}")]
    Timeout(String),
    /// The browser or driver is gone; nothing further will succeed
    #[error("session lost: {0}")]
    Disconnected(String),
    /// Any other command failure (missing element, stale reference, ...)
    #[error("command failed: {0}")]
    Command(String),
}

impl SessionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, SessionError::Disconnected(_))
    }
}

/// A live browser-automation handle.
///
/// Calls are issued strictly one after another by a single owner; every
/// wait is bounded by the timeout it is given or by the page-load timeout
/// the session was created with.
#[async_trait]
pub trait Session: Send {
    /// Navigate to a URL
    async fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    /// Wait until an element matching `selector` is present
    async fn wait_for(&mut self, selector: &Selector, timeout: Duration)
    -> Result<(), SessionError>;

    /// Visible text of the first element matching `selector`
    async fn read_text(&mut self, selector: &Selector) -> Result<String, SessionError>;

    /// Type into the first element matching `selector`
    async fn send_keys(&mut self, selector: &Selector, text: &str) -> Result<(), SessionError>;

    /// Click the first element matching `selector`
    async fn click(&mut self, selector: &Selector) -> Result<(), SessionError>;

    /// Reload the current page
    async fn refresh(&mut self) -> Result<(), SessionError>;

    /// End the session and release the browser
    async fn close(&mut self) -> Result<(), SessionError>;
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
