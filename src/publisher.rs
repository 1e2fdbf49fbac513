//! Bounded-retry publishing of notification envelopes.
//!
//! A `Publisher` owns one producer handle for its whole lifetime. Each
//! `publish` call builds the envelope once, then sends the same body up to
//! `retry.max_attempts` times with a flat pause after every failure.

use crate::{
    config::MessagingConfig,
    core::{
        MessageProducer, NotificationEvent, NotificationPayload, OutboundMessage, ProducerError,
        EVENT_SOURCE_ATTRIBUTE, EVENT_TYPE_ATTRIBUTE,
    },
    credentials::{CredentialSource, CredentialsError},
    envelope,
    sns::SnsProducer,
};
use serde_json::json;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{error, info, instrument, warn};

#[derive(Error, Debug)]
pub enum PublishError {
    /// Every attempt in the retry budget failed.
    #[error("Failed sending notification to messaging system. data: {data}; error: {source}")]
    Exhausted {
        attempts: u32,
        /// JSON describing the configuration and the original payload.
        data: String,
        source: ProducerError,
    },

    #[error("failed to encode notification envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Publishes notifications to one configured topic.
pub struct Publisher {
    config: MessagingConfig,
    producer: Arc<dyn MessageProducer>,
}

impl Publisher {
    /// Creates a publisher around an existing producer.
    pub fn new(config: MessagingConfig, producer: Arc<dyn MessageProducer>) -> Self {
        Self { config, producer }
    }

    /// Creates a publisher backed by SNS.
    pub async fn connect(
        config: MessagingConfig,
        credentials: &dyn CredentialSource,
    ) -> Result<Self, CredentialsError> {
        let producer = SnsProducer::connect(&config, credentials).await?;
        info!(
            region = %config.region,
            topic_arn = %config.topic_arn,
            source = %config.source,
            "Publisher connected"
        );
        Ok(Self::new(config, Arc::new(producer)))
    }

    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }

    /// Builds the envelope for `payload`, stamped with this publisher's source.
    pub fn build_event(&self, payload: &NotificationPayload) -> NotificationEvent {
        envelope::build_event(payload, &self.config.source)
    }

    /// Publishes `payload`, retrying transport failures within the budget.
    ///
    /// The envelope (including its `created` timestamp) is built once and
    /// the same body is sent on every attempt.
    #[instrument(
        skip(self, payload),
        fields(event_type = ?payload.event_type, correlation_id = ?payload.correlation_id)
    )]
    pub async fn publish(&self, payload: &NotificationPayload) -> Result<(), PublishError> {
        let event = self.build_event(payload);
        let mut attributes = BTreeMap::from([(
            EVENT_SOURCE_ATTRIBUTE.to_string(),
            self.config.source.clone(),
        )]);
        // A payload without a type carries no eventType attribute.
        if let Some(event_type) = &payload.event_type {
            attributes.insert(EVENT_TYPE_ATTRIBUTE.to_string(), event_type.clone());
        }
        let message = OutboundMessage {
            topic_arn: self.config.topic_arn.clone(),
            body: serde_json::to_string(&event)?,
            attributes,
        };

        let max_attempts = self.config.retry.max_attempts.max(1);
        let backoff = Duration::from_millis(self.config.retry.backoff_ms);
        let start = Instant::now();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            metrics::counter!("notification_publish_attempts_total").increment(1);
            match self.producer.send(&message).await {
                Ok(message_id) => {
                    metrics::counter!("notifications_published_total").increment(1);
                    metrics::histogram!("notification_publish_duration_seconds")
                        .record(start.elapsed().as_secs_f64());
                    info!(attempt, message_id = %message_id, "Notification published");
                    return Ok(());
                }
                Err(e) => {
                    metrics::counter!("notification_publish_failures_total").increment(1);
                    warn!(attempt, max_attempts, error = %e, "Notification publish attempt failed");
                    last_error = Some(e);
                    // The pause also follows the final attempt.
                    sleep(backoff).await;
                }
            }
        }

        metrics::counter!("notifications_exhausted_total").increment(1);
        let source = last_error.unwrap_or_else(|| ProducerError::Send("no attempt was made".into()));
        let err = PublishError::Exhausted {
            attempts: max_attempts,
            data: self.failure_context(payload),
            source,
        };
        error!(error = %err, "Giving up on notification");
        Err(err)
    }

    fn failure_context(&self, payload: &NotificationPayload) -> String {
        json!({
            "region": self.config.region,
            "topicArn": self.config.topic_arn,
            "endpoint": self.config.endpoint.as_deref().unwrap_or_default(),
            "source": self.config.source,
            "payload": payload,
        })
        .to_string()
    }
}
