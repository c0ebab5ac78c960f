use std::fmt;

use crate::credentials::CredentialError;
use crate::session::SessionError;
use crate::status::OrderStatus;
use crate::types::LoginStage;

/// Login form could not be completed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("login failed at {stage} stage: {source}")]
pub struct LoginFailure {
    pub stage: LoginStage,
    pub source: SessionError,
}

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum NotifierError {
    /// Credentials missing or unreadable (exit code 2)
    Credentials(CredentialError),
    /// Login form could not be completed (exit code 3)
    LoginFailed(LoginFailure),
    /// Single check found the order still on its way (exit code 4)
    NotArrived(OrderStatus),
    /// Browser session lost mid-run (exit code 5)
    Session(SessionError),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl NotifierError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NotifierError::Credentials(_) => 2,
            NotifierError::LoginFailed(_) => 3,
            NotifierError::NotArrived(_) => 4,
            NotifierError::Session(_) => 5,
            NotifierError::Other(_) => 1,
        }
    }
}

impl fmt::Display for NotifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierError::Credentials(err) => write!(f, "missing credentials: {}", err),
            NotifierError::LoginFailed(err) => write!(f, "{}", err),
            NotifierError::NotArrived(status) => {
                write!(f, "order has not arrived (status: {})", status)
            }
            NotifierError::Session(err) => write!(f, "browser session failed: {}", err),
            NotifierError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for NotifierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifierError::Credentials(err) => Some(err),
            NotifierError::LoginFailed(err) => Some(err),
            NotifierError::Session(err) => Some(err),
            NotifierError::Other(err) => Some(err.as_ref()),
            NotifierError::NotArrived(_) => None,
        }
    }
}

impl From<CredentialError> for NotifierError {
    fn from(err: CredentialError) -> Self {
        NotifierError::Credentials(err)
    }
}

impl From<LoginFailure> for NotifierError {
    fn from(err: LoginFailure) -> Self {
        NotifierError::LoginFailed(err)
    }
}

impl From<SessionError> for NotifierError {
    fn from(err: SessionError) -> Self {
        NotifierError::Session(err)
    }
}

impl From<anyhow::Error> for NotifierError {
    fn from(err: anyhow::Error) -> Self {
        NotifierError::Other(err)
    }
}
