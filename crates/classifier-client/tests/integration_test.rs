//! Integration tests for the classifier client
//!
//! These tests require a running Puppet Enterprise classifier.
//! Set CLASSIFIER_URL and PE_TOKEN environment variables to run.

use classifier_client::{ClassifierClient, NodeGroupPayload};

fn live_client() -> ClassifierClient {
    let url = std::env::var("CLASSIFIER_URL")
        .unwrap_or_else(|_| "https://localhost:4433".to_string());
    let token = std::env::var("PE_TOKEN")
        .expect("PE_TOKEN environment variable must be set");

    ClassifierClient::new(url, token).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running classifier
async fn test_validate_token() {
    let client = live_client();

    let result = client.validate_token().await;
    assert!(result.is_ok(), "Token rejected: {:?}", result.err());
}

#[tokio::test]
#[ignore]
async fn test_fetch_groups_contains_root() {
    let client = live_client();

    let groups = client.fetch_groups().await
        .expect("Failed to fetch node groups");

    println!("Found {} node groups", groups.len());
    assert!(groups.iter().any(|g| g.name == "All Nodes"));
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_group() {
    let client = live_client();

    let groups = client.fetch_groups().await
        .expect("Failed to fetch node groups");
    let root = groups.iter()
        .find(|g| g.name == "All Nodes")
        .expect("Root group missing");

    let payload = NodeGroupPayload {
        name: Some("classifier-client integration".to_string()),
        parent: Some(root.id.clone()),
        environment: Some("production".to_string()),
        ..Default::default()
    };

    let created = client.create_group(&payload).await;

    let id = created.expect("Failed to create node group");
    println!("Created node group: {:?}", id);

    // Clean up
    let groups = client.fetch_groups().await.expect("Failed to fetch node groups");
    let group = groups
        .iter()
        .find(|g| Some(&g.name) == payload.name.as_ref())
        .expect("Created node group not listed");
    client
        .delete_group(&group.id)
        .await
        .expect("Failed to delete node group");
}
