//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the `msgpub` binary
//! using the `clap` crate. Connection arguments are merged over the
//! configuration from `msgpub.toml` and environment variables; the event
//! arguments describe the single notification to publish.

use crate::core::NotificationPayload;
use anyhow::{Context, Result};
use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Publish one notification to a pub/sub topic.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Transport region.
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Destination topic ARN.
    #[arg(long, value_name = "ARN")]
    pub topic_arn: Option<String>,

    /// Endpoint override (local development only).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Source tag stamped into the envelope.
    #[arg(long, value_name = "NAME")]
    pub source: Option<String>,

    /// Logging level, e.g. `debug`.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Event kind to publish.
    #[arg(long = "type", value_name = "TYPE")]
    pub event_type: Option<String>,

    /// Event data as a JSON object.
    #[arg(long, value_name = "JSON", default_value = "{}")]
    pub data: String,

    /// Correlation id propagated with the event.
    #[arg(long, value_name = "ID")]
    pub correlation_id: Option<String>,

    /// Envelope version (defaults to 1).
    #[arg(long = "event-version", value_name = "N")]
    pub event_version: Option<u32>,
}

impl Cli {
    /// Builds the notification described by the event arguments.
    pub fn payload(&self) -> Result<NotificationPayload> {
        let event_type = self
            .event_type
            .clone()
            .context("--type is required to publish a notification")?;
        // `Default` leaves `data` empty rather than at clap's default value.
        let raw = if self.data.trim().is_empty() { "{}" } else { &self.data };
        let data = serde_json::from_str(raw).context("--data must be a JSON object")?;

        Ok(NotificationPayload {
            event_type: Some(event_type),
            data: Some(data),
            correlation_id: self.correlation_id.clone(),
            version: self.event_version,
        })
    }
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        let mut messaging = Dict::new();

        if let Some(region) = &self.region {
            messaging.insert("region".into(), Value::from(region.clone()));
        }
        if let Some(topic_arn) = &self.topic_arn {
            messaging.insert("topic_arn".into(), Value::from(topic_arn.clone()));
        }
        if let Some(endpoint) = &self.endpoint {
            messaging.insert("endpoint".into(), Value::from(endpoint.clone()));
        }
        if let Some(source) = &self.source {
            messaging.insert("source".into(), Value::from(source.clone()));
        }
        if !messaging.is_empty() {
            dict.insert("messaging".into(), Value::from(messaging));
        }

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
