use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::LoginFailure;
use crate::session::{Selector, Session, SessionError};
use crate::types::{Credentials, LoginStage, TrackerPage};

/// Sign in through the tracker's two-step login form.
///
/// Success is not checked here. The first status read afterwards is what
/// shows whether the login took.
pub async fn login<S: Session + ?Sized>(
    session: &mut S,
    credentials: &Credentials,
    page: &TrackerPage,
    timeout: Duration,
) -> Result<(), LoginFailure> {
    debug!("logging in");

    match session.goto(&page.url).await {
        Ok(()) => {}
        // A slow page load still leaves the form to be found by the waits below
        Err(SessionError::Timeout(msg)) => warn!("page load timed out: {}", msg),
        Err(source) => {
            return Err(LoginFailure {
                stage: LoginStage::Navigate,
                source,
            });
        }
    }

    wait_and_submit(
        session,
        LoginStage::Username,
        &page.username_field,
        &page.username_submit,
        credentials.username(),
        timeout,
    )
    .await?;

    wait_and_submit(
        session,
        LoginStage::Password,
        &page.password_field,
        &page.password_submit,
        credentials.password(),
        timeout,
    )
    .await
}

async fn wait_and_submit<S: Session + ?Sized>(
    session: &mut S,
    stage: LoginStage,
    field: &Selector,
    button: &Selector,
    data: &str,
    timeout: Duration,
) -> Result<(), LoginFailure> {
    debug!("wait for {} before clicking {}", field, button);

    let fail = |source| LoginFailure { stage, source };

    session.wait_for(field, timeout).await.map_err(fail)?;
    session.send_keys(field, data).await.map_err(fail)?;

    match session.click(button).await {
        Ok(()) => Ok(()),
        // Best-effort: the click often lands and the next page is merely slow.
        // Keep going and let the next wait decide.
        Err(SessionError::Timeout(_)) => {
            warn!("page load timed out");
            Ok(())
        }
        Err(source) => Err(fail(source)),
    }
}
