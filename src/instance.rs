//! Process-wide shared publisher.
//!
//! Prefer constructing one `Publisher` at startup and passing it to call
//! sites. This accessor exists for code that cannot carry the handle. The
//! first successful initialization wins; later configuration arguments are
//! ignored. Initialization runs at most once even under concurrent callers.

use crate::{
    config::MessagingConfig,
    credentials::{CredentialsError, EnvCredentials},
    publisher::Publisher,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

static INSTANCE: OnceCell<Arc<Publisher>> = OnceCell::const_new();

#[derive(Error, Debug)]
pub enum InstanceError {
    /// Asked for the shared publisher before any configuration was supplied.
    #[error("publisher requested before it was initialized; supply a configuration on first use")]
    NotInitialized,

    #[error("failed to construct publisher: {0}")]
    Credentials(#[from] CredentialsError),
}

/// Returns the shared publisher, constructing it from `config` on first use.
///
/// Once an instance exists `config` is ignored, even if it differs.
pub async fn get_instance(config: Option<MessagingConfig>) -> Result<Arc<Publisher>, InstanceError> {
    if let Some(publisher) = INSTANCE.get() {
        if config.is_some() {
            debug!("Shared publisher already initialized; ignoring configuration");
        }
        return Ok(publisher.clone());
    }

    let config = config.ok_or(InstanceError::NotInitialized)?;
    let publisher = INSTANCE
        .get_or_try_init(|| async move {
            info!(topic_arn = %config.topic_arn, "Initializing shared publisher");
            let publisher = Publisher::connect(config, &EnvCredentials::default()).await?;
            Ok::<_, InstanceError>(Arc::new(publisher))
        })
        .await?;
    Ok(publisher.clone())
}

/// Registers an explicitly constructed publisher as the shared instance.
///
/// Returns the instance that ended up shared, which is the earlier one if
/// the accessor was already initialized.
pub async fn install(publisher: Publisher) -> Arc<Publisher> {
    INSTANCE
        .get_or_init(|| async move { Arc::new(publisher) })
        .await
        .clone()
}
