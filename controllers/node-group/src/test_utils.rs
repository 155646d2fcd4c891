//! Test utilities for unit testing the reconciler
//!
//! Fixtures mirror a freshly installed classifier: the root group plus a
//! few infrastructure groups.

#[cfg(test)]
use crate::notice::RecordingSink;
#[cfg(test)]
use crate::reconciler::NodeGroupReconciler;
#[cfg(test)]
use classifier_client::{Classes, MockClassifierClient, NodeGroup, Variables};
#[cfg(test)]
use serde_json::json;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
pub const ROOT_ID: &str = "00000000-0000-4000-8000-000000000000";
#[cfg(test)]
pub const INFRASTRUCTURE_ID: &str = "66844661-b59c-466e-826a-096c955268bc";
#[cfg(test)]
pub const BROKER_ID: &str = "6324536f-3df4-4eab-8a7c-ae00be078d0d";
#[cfg(test)]
pub const ARTIFACTORY_ID: &str = "5a585133-0680-4143-a7af-422731408027";

/// Helper to create a remote node group
#[cfg(test)]
pub fn create_test_group(id: &str, name: &str, parent: &str) -> NodeGroup {
    NodeGroup {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        environment: "production".to_string(),
        environment_trumps: false,
        parent: Some(parent.to_string()),
        rule: None,
        classes: Classes::new(),
        variables: Variables::new(),
        serial_number: Some(1),
    }
}

/// Mock client preloaded with the standard group tree
#[cfg(test)]
pub fn create_seeded_client() -> MockClassifierClient {
    let client = MockClassifierClient::new("http://test-classifier/classifier-api/v1");

    let mut root = create_test_group(ROOT_ID, "All Nodes", ROOT_ID);
    root.rule = Some(vec![json!("and"), json!(["~", "name", ".*"])]);
    client.add_group(root);

    client.add_group(create_test_group(INFRASTRUCTURE_ID, "PE Infrastructure", ROOT_ID));

    let mut broker = create_test_group(BROKER_ID, "PE ActiveMQ Broker", INFRASTRUCTURE_ID);
    broker.rule = Some(vec![json!("or"), json!(["=", "name", "master.inf.puppet.vm"])]);
    broker
        .classes
        .insert("puppet_enterprise::profile::amq::broker".to_string(), Default::default());
    client.add_group(broker);

    let mut artifactory = create_test_group(ARTIFACTORY_ID, "Artifactory", ROOT_ID);
    artifactory.description = Some("Binary repository".to_string());
    artifactory.variables.insert("my-app".to_string(), json!("value"));
    client.add_group(artifactory);

    client
}

/// Reconciler over `client` with a recording notice sink
#[cfg(test)]
pub fn create_test_reconciler(client: &MockClassifierClient) -> (NodeGroupReconciler, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let reconciler = NodeGroupReconciler::with_notices(Box::new(client.clone()), sink.clone());
    (reconciler, sink)
}
