//! Ambient credential discovery for the inference endpoint.
//!
//! Credentials are never prompted for. They come from the environment first
//! and from the system keyring second; absence is reported per request by the
//! client rather than at start-up.

use std::fmt;

use keyring::Entry;
use tracing::{debug, warn};

pub const CREDENTIAL_ENV_VAR: &str = "AZURE_INFERENCE_CREDENTIAL";
pub const KEYRING_SERVICE: &str = "foundry-compare";
pub const KEYRING_USER: &str = "endpoint";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Environment(&'static str),
    Keyring,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment(var) => write!(f, "environment ({var})"),
            CredentialSource::Keyring => write!(f, "system keyring"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(secret: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            secret: secret.into(),
            source,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Default)]
pub struct CredentialResolver;

impl CredentialResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self) -> Option<Credential> {
        self.resolve_from(std::env::var(CREDENTIAL_ENV_VAR).ok(), read_keyring)
    }

    /// Pick the first non-blank credential. The keyring is only consulted when
    /// the environment has nothing usable.
    pub fn resolve_from<F>(&self, env_value: Option<String>, keyring_lookup: F) -> Option<Credential>
    where
        F: FnOnce() -> Result<Option<String>, keyring::Error>,
    {
        if let Some(secret) = non_blank(env_value) {
            debug!(source = %CredentialSource::Environment(CREDENTIAL_ENV_VAR), "Credential found");
            return Some(Credential::new(
                secret,
                CredentialSource::Environment(CREDENTIAL_ENV_VAR),
            ));
        }

        match keyring_lookup() {
            Ok(value) => match non_blank(value) {
                Some(secret) => {
                    debug!(source = %CredentialSource::Keyring, "Credential found");
                    Some(Credential::new(secret, CredentialSource::Keyring))
                }
                None => {
                    debug!("No credential in environment or keyring");
                    None
                }
            },
            Err(err) => {
                warn!(error = %err, recoverable = is_recoverable_keyring_error(&err), "Keyring lookup failed");
                None
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_keyring() -> Result<Option<String>, keyring::Error> {
    let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    match entry.get_password() {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err),
    }
}

/// A locked or unreachable keychain may work on a later run; anything else
/// needs the user to fix the entry.
fn is_recoverable_keyring_error(err: &keyring::Error) -> bool {
    matches!(
        err,
        keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_)
    )
}
