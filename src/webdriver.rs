use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::session::{Selector, Session, SessionError};
use crate::types::RunConfig;

/// Masks the usual automation fingerprints. Applied after every page load
/// because each navigation starts a fresh document.
const STEALTH_SCRIPT: &str = r#"
    (function() {
        if (window.__relish_stealth) return;
        window.__relish_stealth = true;

        Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
        Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
        Object.defineProperty(navigator, 'vendor', { get: () => 'Google Inc.' });
        Object.defineProperty(navigator, 'platform', { get: () => 'Win32' });

        const patch = (proto) => {
            if (!proto) return;
            const getParameter = proto.getParameter;
            proto.getParameter = function(parameter) {
                // UNMASKED_VENDOR_WEBGL / UNMASKED_RENDERER_WEBGL
                if (parameter === 37445) return 'Intel Inc.';
                if (parameter === 37446) return 'Intel Iris OpenGL Engine';
                return getParameter.call(this, parameter);
            };
        };
        patch(window.WebGLRenderingContext && WebGLRenderingContext.prototype);
        patch(window.WebGL2RenderingContext && WebGL2RenderingContext.prototype);
    })();
"#;

/// Chromedriver reports a dead browser as a plain `unknown error`
const BROWSER_GONE: &[&str] = &["chrome not reachable", "disconnected:", "session deleted"];

fn browser_gone(message: &str) -> bool {
    let lower = message.to_lowercase();
    BROWSER_GONE.iter().any(|m| lower.contains(m))
}

impl From<CmdError> for SessionError {
    fn from(err: CmdError) -> Self {
        let msg = err.to_string();
        match &err {
            CmdError::WaitTimeout => SessionError::Timeout(msg),
            // Transport failures: the driver itself is unreachable
            CmdError::Lost(_) | CmdError::Failed(_) | CmdError::NoSuchWindow(_) => {
                SessionError::Disconnected(msg)
            }
            CmdError::Standard(e) => match e.error() {
                "timeout" | "script timeout" => SessionError::Timeout(msg),
                "invalid session id" => SessionError::Disconnected(msg),
                _ if browser_gone(&e.message) => SessionError::Disconnected(msg),
                _ => SessionError::Command(msg),
            },
            _ => SessionError::Command(msg),
        }
    }
}

/// Chrome session driven over WebDriver
pub struct Browser {
    client: Option<Client>,
    // Removed from disk when the browser is dropped
    _profile_dir: tempfile::TempDir,
}

impl Browser {
    /// Start a Chrome session through the WebDriver at `webdriver_url`
    pub async fn launch(config: &RunConfig, webdriver_url: &str) -> Result<Self> {
        info!("Connecting to Chrome WebDriver at {}", webdriver_url);

        // Unique profile per run so a stale Chrome lock never blocks startup
        let profile_dir = tempfile::Builder::new()
            .prefix("relish-notifier-chrome-")
            .tempdir()
            .context("Failed to create Chrome profile directory")?;

        let caps = chrome_capabilities(config, profile_dir.path());

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        debug!("Setting page load timeout to {:?}", config.page_timeout);
        if let Err(e) = client
            .update_timeouts(TimeoutConfiguration::new(
                None,
                Some(config.page_timeout),
                None,
            ))
            .await
        {
            debug!("Note: Could not set page load timeout: {}", e);
            // Continue anyway - element waits are bounded on their own
        }

        Ok(Browser {
            client: Some(client),
            _profile_dir: profile_dir,
        })
    }

    fn client(&self) -> Result<&Client, SessionError> {
        self.client
            .as_ref()
            .ok_or_else(|| SessionError::Disconnected("webdriver session has been closed".into()))
    }

    async fn apply_stealth(&self) {
        if let Ok(client) = self.client() {
            // Ignore errors as it might fail on some pages
            let _ = client.execute(STEALTH_SCRIPT, vec![]).await;
        }
    }
}

/// Capabilities for a Chrome session matching the run settings
pub fn chrome_capabilities(
    config: &RunConfig,
    profile_dir: &Path,
) -> serde_json::Map<String, serde_json::Value> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--lang=en-US".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
    ];

    if config.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
        args.push("--disable-dev-shm-usage".to_string());
    }

    if !config.extensions {
        args.push("--disable-extensions".to_string());
    }

    args.push(format!("--user-data-dir={}", profile_dir.display()));

    let mut chrome_opts = serde_json::Map::new();
    chrome_opts.insert("args".to_string(), json!(args));
    chrome_opts.insert("excludeSwitches".to_string(), json!(["enable-automation"]));
    chrome_opts.insert("useAutomationExtension".to_string(), json!(false));

    let mut caps = serde_json::Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}

#[async_trait]
impl Session for Browser {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        info!("Navigating to {}", url);
        self.client()?.goto(url).await?;
        self.apply_stealth().await;
        Ok(())
    }

    async fn wait_for(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let css = selector.css();
        debug!("Waiting up to {:?} for {}", timeout, css);
        self.client()?
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(&css))
            .await?;
        Ok(())
    }

    async fn read_text(&mut self, selector: &Selector) -> Result<String, SessionError> {
        let css = selector.css();
        let element = self.client()?.find(Locator::Css(&css)).await?;
        Ok(element.text().await?)
    }

    async fn send_keys(&mut self, selector: &Selector, text: &str) -> Result<(), SessionError> {
        let css = selector.css();
        let element = self.client()?.find(Locator::Css(&css)).await?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> Result<(), SessionError> {
        let css = selector.css();
        debug!("Clicking {}", css);
        let element = self.client()?.find(Locator::Css(&css)).await?;
        element.click().await?;
        self.apply_stealth().await;
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), SessionError> {
        self.client()?.refresh().await?;
        self.apply_stealth().await;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        match self.client.take() {
            Some(client) => {
                info!("Closing browser");
                client.close().await?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
