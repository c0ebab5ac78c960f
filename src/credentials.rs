use thiserror::Error;
use tracing::debug;

use crate::types::Credentials;

/// Keyring service the tracker login is stored under
pub const KEYRING_SERVICE: &str = "relish-notifier";
/// Keyring account holding the login email
pub const KEYRING_USERNAME_ACCOUNT: &str = "EMAIL";
/// Keyring account holding the password
pub const KEYRING_PASSWORD_ACCOUNT: &str = "PASSWORD";

pub const ENV_USERNAME: &str = "RELISH_EMAIL";
pub const ENV_PASSWORD: &str = "RELISH_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The named secret is absent or empty
    #[error("{0} is not set")]
    Missing(String),
    /// The secret store itself failed
    #[error("secret store error: {0}")]
    Store(String),
}

/// Source of the tracker username/password
pub trait CredentialProvider {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    fn credentials(&self) -> Result<Credentials, CredentialError>;
}

/// Which provider the CLI selects
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CredentialSource {
    /// OS secret store (macOS Keychain, Secret Service, Windows Credential Manager)
    Keyring,
    /// RELISH_EMAIL / RELISH_PASSWORD environment variables
    Env,
}

impl CredentialSource {
    pub fn provider(self) -> Box<dyn CredentialProvider> {
        match self {
            CredentialSource::Keyring => Box::new(KeyringStore::default()),
            CredentialSource::Env => Box::new(EnvStore::default()),
        }
    }
}

/// Credentials kept in the OS keyring
#[derive(Clone, Debug)]
pub struct KeyringStore {
    service: String,
    username_account: String,
    password_account: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        KeyringStore {
            service: KEYRING_SERVICE.to_string(),
            username_account: KEYRING_USERNAME_ACCOUNT.to_string(),
            password_account: KEYRING_PASSWORD_ACCOUNT.to_string(),
        }
    }
}

impl KeyringStore {
    fn lookup(&self, account: &str) -> Result<Option<String>, CredentialError> {
        let entry = keyring::Entry::new(&self.service, account)
            .map_err(|e| CredentialError::Store(e.to_string()))?;

        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Store(e.to_string())),
        }
    }
}

impl CredentialProvider for KeyringStore {
    fn describe(&self) -> String {
        format!("keyring service '{}'", self.service)
    }

    fn credentials(&self) -> Result<Credentials, CredentialError> {
        debug!("Reading credentials from {}", self.describe());
        let username = self.lookup(&self.username_account)?;
        let password = self.lookup(&self.password_account)?;
        assemble(
            (&self.username_account, username),
            (&self.password_account, password),
        )
    }
}

/// Credentials taken from environment variables
#[derive(Clone, Debug)]
pub struct EnvStore {
    username_var: String,
    password_var: String,
}

impl Default for EnvStore {
    fn default() -> Self {
        EnvStore {
            username_var: ENV_USERNAME.to_string(),
            password_var: ENV_PASSWORD.to_string(),
        }
    }
}

impl EnvStore {
    pub fn new(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        EnvStore {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }
}

impl CredentialProvider for EnvStore {
    fn describe(&self) -> String {
        format!("environment ({}, {})", self.username_var, self.password_var)
    }

    fn credentials(&self) -> Result<Credentials, CredentialError> {
        debug!("Reading credentials from {}", self.describe());
        assemble(
            (&self.username_var, std::env::var(&self.username_var).ok()),
            (&self.password_var, std::env::var(&self.password_var).ok()),
        )
    }
}

/// Combine two looked-up secrets, naming the first one that is absent or empty
pub(crate) fn assemble(
    username: (&str, Option<String>),
    password: (&str, Option<String>),
) -> Result<Credentials, CredentialError> {
    let (username_name, username) = username;
    let (password_name, password) = password;

    let username = username
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CredentialError::Missing(username_name.to_string()))?;
    let password = password
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CredentialError::Missing(password_name.to_string()))?;

    Credentials::new(username, password)
        .ok_or_else(|| CredentialError::Missing(username_name.to_string()))
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;
