//! Integration test for a failed first initialization of the shared publisher.
//!
//! Runs in its own binary so the accessor starts out empty.

use msgpub::{credentials::CredentialsError, get_instance, InstanceError};

mod helpers;
use helpers::orders_config;

#[tokio::test]
async fn test_credential_failure_leaves_accessor_uninitialized() {
    // Arrange: the endpoint override path needs explicit credentials
    std::env::remove_var("AWS_ACCESS_KEY_ID");
    std::env::remove_var("AWS_SECRET_ACCESS_KEY");
    let config = orders_config().with_endpoint("http://127.0.0.1:4566");

    // Act
    let result = get_instance(Some(config)).await;

    // Assert: the failure surfaces and nothing is cached
    match result {
        Err(InstanceError::Credentials(CredentialsError::MissingVar(name))) => {
            assert_eq!(name, "AWS_ACCESS_KEY_ID");
        }
        Err(other) => panic!("expected a credentials error, got {:?}", other),
        Ok(_) => panic!("expected a credentials error, got a publisher"),
    }
    let result = get_instance(None).await;
    assert!(matches!(result, Err(InstanceError::NotInitialized)));
}
