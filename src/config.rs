//! Configuration management for msgpub
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all publisher settings. It uses the `figment`
//! crate to load configuration from a `msgpub.toml` file and merge it
//! with environment variables and command-line overrides.

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::Cli;

/// Number of send attempts per `publish` call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
/// Flat pause after each failed attempt, in milliseconds.
pub const DEFAULT_BACKOFF_MS: u64 = 2000;

const DEFAULT_CONFIG_FILE: &str = "msgpub.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Configuration for the topic publisher.
    pub messaging: MessagingConfig,
}

/// Connection settings for one publisher. Immutable once a `Publisher`
/// has been built from it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MessagingConfig {
    /// Transport region, e.g. `us-east-1`.
    pub region: String,
    /// Destination topic ARN.
    pub topic_arn: String,
    /// Origin tag stamped into every envelope and the `eventSource` attribute.
    pub source: String,
    /// Endpoint override for local development. When set, explicit
    /// credentials are resolved instead of using the default chain.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Retry budget and backoff.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl MessagingConfig {
    pub fn new(
        region: impl Into<String>,
        topic_arn: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            topic_arn: topic_arn.into(),
            source: source.into(),
            endpoint: None,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Retry settings for a single `publish` call.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of send attempts, including the first one.
    pub max_attempts: u32,
    /// Pause after every failed attempt, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_ms: DEFAULT_BACKOFF_MS,
        }
    }
}

impl Config {
    /// Loads the application configuration by layering sources: defaults,
    /// the TOML file, `MSGPUB_` environment variables and CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // Nested keys use a double underscore, e.g. MSGPUB_MESSAGING__TOPIC_ARN
            .merge(Env::prefixed("MSGPUB_").split("__"))
            .merge(cli.clone())
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the fields a publisher cannot be built without.
    pub fn validate(&self) -> Result<()> {
        let messaging = &self.messaging;
        if messaging.region.trim().is_empty() {
            bail!("messaging.region must not be empty");
        }
        if messaging.topic_arn.trim().is_empty() {
            bail!("messaging.topic_arn must not be empty");
        }
        if messaging.source.trim().is_empty() {
            bail!("messaging.source must not be empty");
        }
        Ok(())
    }
}

// Provide a default implementation for tests and easy setup. The topic and
// source have no sensible default and must come from a real source.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            messaging: MessagingConfig::new("us-east-1", "", ""),
        }
    }
}
