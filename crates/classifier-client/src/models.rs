//! Classifier API models
//!
//! These models match the node classifier v1 `groups` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Class name to class parameters
pub type Classes = BTreeMap<String, BTreeMap<String, Value>>;

/// Variable name to value
pub type Variables = BTreeMap<String, Value>;

/// Rule expression, e.g. `["=", ["trusted", "extensions", "pp_application"], "app"]`
pub type Rule = Vec<Value>;

/// Node group as returned by `GET /groups`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NodeGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub environment: String,
    #[serde(default)]
    pub environment_trumps: bool,
    /// Parent group id (the root group is its own parent)
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub rule: Option<Rule>,
    #[serde(default)]
    pub classes: Classes,
    #[serde(default)]
    pub variables: Variables,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<u64>,
}

/// Request body for `POST /groups` and `PUT /groups/{id}`
///
/// Unset fields are left out of the JSON body so the service applies its
/// own defaults on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NodeGroupPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_trumps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Classes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_group_deserializes_service_document() {
        let group: NodeGroup = serde_json::from_value(json!({
            "environment_trumps": false,
            "parent": "00000000-0000-4000-8000-000000000000",
            "name": "PE ActiveMQ Broker",
            "rule": ["or", ["=", "name", "master.inf.puppet.vm"]],
            "variables": {},
            "id": "6324536f-3df4-4eab-8a7c-ae00be078d0d",
            "environment": "production",
            "classes": {"puppet_enterprise::profile::amq::broker": {}},
            "config_data": {},
            "serial_number": 3
        }))
        .unwrap();

        assert_eq!(group.name, "PE ActiveMQ Broker");
        assert_eq!(group.description, None);
        assert_eq!(group.serial_number, Some(3));
        assert!(group.classes.contains_key("puppet_enterprise::profile::amq::broker"));
    }

    #[test]
    fn test_node_group_without_rule_or_flags() {
        let group: NodeGroup = serde_json::from_value(json!({
            "id": "a",
            "name": "Bare",
            "environment": "production",
            "parent": "root"
        }))
        .unwrap();

        assert!(!group.environment_trumps);
        assert!(group.rule.is_none());
        assert!(group.classes.is_empty());
        assert!(group.variables.is_empty());
    }

    #[test]
    fn test_payload_omits_unset_fields() {
        let payload = NodeGroupPayload {
            name: Some("Test Group".to_string()),
            environment: Some("production".to_string()),
            classes: Some(Classes::new()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Test Group", "environment": "production", "classes": {}})
        );
    }
}
