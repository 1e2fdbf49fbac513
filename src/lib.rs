//! msgpub - A publisher client for pub/sub notification topics
//!
//! This library wraps an outbound topic producer, formats application
//! events into a versioned envelope, and retries transient publish failures
//! a bounded number of times before giving up.

pub mod cli;
pub mod config;
pub mod core;
pub mod credentials;
pub mod envelope;
pub mod instance;
pub mod publisher;
pub mod sns;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export core types for convenience
pub use crate::config::{MessagingConfig, RetryConfig};
pub use crate::core::*;
pub use crate::envelope::build_event;
pub use crate::instance::{get_instance, InstanceError};
pub use crate::publisher::{PublishError, Publisher};
