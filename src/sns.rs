//! SNS implementation of the message producer.

use crate::{
    config::MessagingConfig,
    core::{MessageProducer, OutboundMessage, ProducerError},
    credentials::{CredentialSource, CredentialsError},
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::{
    config::{retry::RetryConfig, Region},
    error::DisplayErrorContext,
    types::MessageAttributeValue,
    Client,
};
use tracing::{debug, instrument};

const STRING_DATA_TYPE: &str = "String";

/// Publishes messages to an SNS topic.
pub struct SnsProducer {
    client: Client,
}

impl SnsProducer {
    /// Creates a producer from the messaging configuration.
    ///
    /// Without an endpoint override the SDK default credential chain is
    /// used. With one, credentials come from `credentials`. The SDK's own
    /// retry layer is disabled; retries belong to the `Publisher`.
    pub async fn connect(
        config: &MessagingConfig,
        credentials: &dyn CredentialSource,
    ) -> Result<Self, CredentialsError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint) = &config.endpoint {
            debug!(endpoint = %endpoint, "Using endpoint override with explicit credentials");
            loader = loader
                .endpoint_url(endpoint.clone())
                .credentials_provider(credentials.resolve()?);
        }

        let sdk_config = loader.load().await;
        Ok(Self::from_client(Client::new(&sdk_config)))
    }

    /// Wraps an already configured SNS client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageProducer for SnsProducer {
    #[instrument(skip(self, message), fields(topic_arn = %message.topic_arn))]
    async fn send(&self, message: &OutboundMessage) -> Result<String, ProducerError> {
        let mut request = self
            .client
            .publish()
            .topic_arn(&message.topic_arn)
            .message(&message.body);

        for (name, value) in &message.attributes {
            let attribute = MessageAttributeValue::builder()
                .data_type(STRING_DATA_TYPE)
                .string_value(value)
                .build()
                .map_err(|e| ProducerError::Send(e.to_string()))?;
            request = request.message_attributes(name, attribute);
        }

        let output = request
            .send()
            .await
            .map_err(|e| ProducerError::Send(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}
