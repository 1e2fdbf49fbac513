//! Explicit credential sources for the endpoint-override path.
//!
//! When a publisher is pointed at a custom endpoint (local stacks, emulators)
//! it does not use the SDK's default credential chain. Instead a
//! [`CredentialSource`] is injected at construction time. [`EnvCredentials`]
//! is the only code in the crate that reads credential environment variables.

use aws_credential_types::Credentials;
use std::env;
use thiserror::Error;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CredentialsError {
    #[error("environment variable {0} is not set")]
    MissingVar(String),
}

/// Resolves the credentials used for an endpoint-override transport.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self) -> Result<Credentials, CredentialsError>;
}

/// Reads an access key pair from environment variables.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    access_key_var: String,
    secret_key_var: String,
}

impl EnvCredentials {
    /// Reads from custom variable names instead of the standard ones.
    pub fn with_vars(access_key_var: impl Into<String>, secret_key_var: impl Into<String>) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
        }
    }

    fn read(name: &str) -> Result<String, CredentialsError> {
        match env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(CredentialsError::MissingVar(name.to_string())),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::with_vars(ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR)
    }
}

impl CredentialSource for EnvCredentials {
    fn resolve(&self) -> Result<Credentials, CredentialsError> {
        let access_key = Self::read(&self.access_key_var)?;
        let secret_key = Self::read(&self.secret_key_var)?;
        Ok(Credentials::new(access_key, secret_key, None, None, "msgpub-env"))
    }
}

/// A fixed key pair, for tests and embedders that manage secrets themselves.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self(Credentials::new(
            access_key.into(),
            secret_key.into(),
            None,
            None,
            "msgpub-static",
        ))
    }
}

impl CredentialSource for StaticCredentials {
    fn resolve(&self) -> Result<Credentials, CredentialsError> {
        Ok(self.0.clone())
    }
}
