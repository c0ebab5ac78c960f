use std::future::Future;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::arrival::ArrivalHandler;
use crate::errors::NotifierError;
use crate::login::login;
use crate::session::{Session, SessionError};
use crate::status::{OrderStatus, classify};
use crate::types::{Credentials, PollOutcome, RunConfig, TrackerPage};

/// Drives one browser session from login until the order arrives.
///
/// The notifier owns the session for its whole life and closes it exactly
/// once when [`Notifier::run`] returns, whichever way the run ends.
pub struct Notifier<S: Session, A: ArrivalHandler> {
    session: S,
    arrival: A,
    credentials: Credentials,
    page: TrackerPage,
    config: RunConfig,
    span: Span,
}

impl<S: Session, A: ArrivalHandler> Notifier<S, A> {
    pub fn new(
        session: S,
        arrival: A,
        credentials: Credentials,
        page: TrackerPage,
        config: RunConfig,
    ) -> Self {
        let span = info_span!("notifier", once = config.once);
        Notifier {
            session,
            arrival,
            credentials,
            page,
            config,
            span,
        }
    }

    /// Log inside `span` instead of the default `notifier` span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Log in, then poll until a terminal state or until `shutdown` resolves.
    ///
    /// An interrupt is not an error: it ends the run with
    /// [`PollOutcome::Cancelled`]. Once the order is seen as arrived the
    /// arrival action always runs to completion.
    pub async fn run<F>(mut self, shutdown: F) -> Result<PollOutcome, NotifierError>
    where
        F: Future<Output = ()>,
    {
        let span = self.span.clone();

        let result = tokio::select! {
            result = self.login_and_poll().instrument(span.clone()) => result,
            _ = shutdown => {
                span.in_scope(|| info!("Interrupted, shutting down"));
                Ok(PollOutcome::Cancelled)
            }
        };

        // Outside the select so an interrupt cannot cut the arrival action short
        if let Ok(PollOutcome::Arrived { .. }) = result {
            self.arrival.on_arrival().instrument(span.clone()).await;
        }

        span.in_scope(|| debug!("closing browser session"));
        if let Err(e) = self.session.close().await {
            span.in_scope(|| warn!("Failed to close browser session: {}", e));
        }

        result
    }

    async fn login_and_poll(&mut self) -> Result<PollOutcome, NotifierError> {
        login(
            &mut self.session,
            &self.credentials,
            &self.page,
            self.config.page_timeout,
        )
        .await?;

        self.poll().await
    }

    async fn poll(&mut self) -> Result<PollOutcome, NotifierError> {
        let mut checks: u64 = 0;

        loop {
            checks += 1;
            let status = self.check_order_status().await?;
            debug!(check = checks, %status, "notifier reports status");

            if status.is_arrived() {
                info!(checks, "Order arrived");
                return Ok(PollOutcome::Arrived { checks });
            }

            if self.config.once {
                return Ok(PollOutcome::NotArrived { status });
            }

            info!(
                %status,
                "Checking again in {} seconds...",
                self.config.interval.as_secs()
            );
            tokio::time::sleep(self.config.interval).await;

            debug!("reloading page");
            match self.session.refresh().await {
                Ok(()) => {}
                Err(e @ SessionError::Disconnected(_)) => return Err(e.into()),
                // The next status read copes with a half-loaded page
                Err(e) => warn!("page reload did not complete: {}", e),
            }
        }
    }

    /// Read and classify the status label.
    ///
    /// Everything short of a lost session degrades to `Unknown`.
    async fn check_order_status(&mut self) -> Result<OrderStatus, SessionError> {
        debug!("check order status");
        let label = &self.page.status_label;

        match self.session.wait_for(label, self.config.page_timeout).await {
            Ok(()) => {}
            Err(SessionError::Timeout(_)) => {
                warn!("timeout waiting for order status");
                return Ok(OrderStatus::Unknown);
            }
            Err(e @ SessionError::Disconnected(_)) => return Err(e),
            Err(e) => {
                warn!("could not find order status: {}", e);
                return Ok(OrderStatus::Unknown);
            }
        }

        let text = match self.session.read_text(label).await {
            Ok(text) => text,
            Err(e @ SessionError::Disconnected(_)) => return Err(e),
            Err(e) => {
                warn!("could not read order status: {}", e);
                return Ok(OrderStatus::Unknown);
            }
        };

        let status = classify(&text);
        if status == OrderStatus::Unknown {
            warn!("unknown order status: {}", text);
        }
        Ok(status)
    }
}
