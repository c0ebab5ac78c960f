// Common test utilities: a scripted browser session and a counting arrival handler

#![allow(dead_code)]

use async_trait::async_trait;
use relish_notifier::{ArrivalHandler, Selector, Session, SessionError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted status read produces
#[derive(Clone, Debug)]
pub enum Read {
    /// The label is present with this text
    Label(&'static str),
    /// The label never shows up within the wait
    Timeout,
    /// The browser went away
    Lost,
}

/// Everything the session was asked to do
#[derive(Debug, Default)]
pub struct Calls {
    pub gotos: Vec<String>,
    pub waits: Vec<String>,
    pub reads: usize,
    pub keys: Vec<(String, String)>,
    pub clicks: Vec<String>,
    pub refreshes: usize,
    pub closes: usize,
}

/// Session that replays scripted status reads.
///
/// Once the script runs out the last entry repeats.
pub struct ScriptedSession {
    status_selector: String,
    reads: VecDeque<Read>,
    last: Read,
    current: Option<Read>,
    /// Login fields that never appear
    pub missing_fields: Vec<String>,
    /// Buttons whose click times out waiting for the next page
    pub slow_clicks: Vec<String>,
    pub calls: Arc<Mutex<Calls>>,
}

impl ScriptedSession {
    pub fn new(reads: Vec<Read>) -> Self {
        let last = reads.last().cloned().unwrap_or(Read::Timeout);
        ScriptedSession {
            status_selector: ".schedule-card-label".to_string(),
            reads: reads.into(),
            last,
            current: None,
            missing_fields: Vec::new(),
            slow_clicks: Vec::new(),
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    pub fn labels(labels: &[&'static str]) -> Self {
        Self::new(labels.iter().copied().map(Read::Label).collect())
    }

    pub fn calls(&self) -> Arc<Mutex<Calls>> {
        Arc::clone(&self.calls)
    }

    fn record<F: FnOnce(&mut Calls)>(&self, f: F) {
        f(&mut self.calls.lock().unwrap());
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.record(|c| c.gotos.push(url.to_string()));
        Ok(())
    }

    async fn wait_for(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let css = selector.css();
        self.record(|c| c.waits.push(css.clone()));

        if css == self.status_selector {
            let next = self.reads.pop_front().unwrap_or_else(|| self.last.clone());
            self.current = Some(next.clone());
            return match next {
                Read::Label(_) => Ok(()),
                Read::Timeout => {
                    tokio::time::sleep(timeout).await;
                    Err(SessionError::Timeout(format!("waiting for {}", css)))
                }
                Read::Lost => Err(SessionError::Disconnected("invalid session id".into())),
            };
        }

        if self.missing_fields.contains(&css) {
            tokio::time::sleep(timeout).await;
            return Err(SessionError::Timeout(format!("waiting for {}", css)));
        }
        Ok(())
    }

    async fn read_text(&mut self, _selector: &Selector) -> Result<String, SessionError> {
        self.record(|c| c.reads += 1);
        match self.current.take() {
            Some(Read::Label(text)) => Ok(text.to_string()),
            _ => Err(SessionError::Command("no such element".into())),
        }
    }

    async fn send_keys(&mut self, selector: &Selector, text: &str) -> Result<(), SessionError> {
        let css = selector.css();
        self.record(|c| c.keys.push((css, text.to_string())));
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> Result<(), SessionError> {
        let css = selector.css();
        let slow = self.slow_clicks.contains(&css);
        self.record(|c| c.clicks.push(css));
        if slow {
            return Err(SessionError::Timeout("page load".into()));
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), SessionError> {
        self.record(|c| c.refreshes += 1);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.record(|c| c.closes += 1);
        Ok(())
    }
}

/// Arrival handler that only counts invocations
#[derive(Clone, Default)]
pub struct CountingArrival {
    pub count: Arc<Mutex<usize>>,
    /// How long the action takes before it counts as done
    pub delay: Duration,
}

impl CountingArrival {
    pub fn with_delay(delay: Duration) -> Self {
        CountingArrival {
            delay,
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        *self.count.lock().unwrap()
    }
}

#[async_trait]
impl ArrivalHandler for CountingArrival {
    async fn on_arrival(&mut self) {
        tokio::time::sleep(self.delay).await;
        *self.count.lock().unwrap() += 1;
    }
}
