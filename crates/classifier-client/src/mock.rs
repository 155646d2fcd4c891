//! Mock ClassifierClient for unit testing
//!
//! This module provides a mock implementation of ClassifierClientTrait that can be
//! used in unit tests without a running classifier service. Every call is recorded
//! so tests can assert on the exact sequence of remote operations.

use crate::classifier_trait::ClassifierClientTrait;
use crate::error::{ApiFailure, ClassifierError};
use crate::models::{NodeGroup, NodeGroupPayload};
use std::sync::{Arc, Mutex};

/// A remote call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    FetchGroups,
    Create(NodeGroupPayload),
    Update(String, NodeGroupPayload),
    Delete(String),
}

/// Mock ClassifierClient for testing
///
/// Stores groups in memory, in insertion order, and applies creates,
/// updates and deletes to that store.
#[derive(Debug, Clone)]
pub struct MockClassifierClient {
    base_url: String,
    groups: Arc<Mutex<Vec<NodeGroup>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    next_failure: Arc<Mutex<Option<ClassifierError>>>,
    next_write_failure: Arc<Mutex<Option<ClassifierError>>>,
}

impl MockClassifierClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            groups: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_failure: Arc::new(Mutex::new(None)),
            next_write_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a group to the mock store (for test setup)
    pub fn add_group(&self, group: NodeGroup) {
        self.groups.lock().unwrap().push(group);
    }

    /// Current contents of the mock store
    pub fn groups(&self) -> Vec<NodeGroup> {
        self.groups.lock().unwrap().clone()
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `fetch_groups` calls made so far
    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, RecordedCall::FetchGroups))
            .count()
    }

    /// Calls other than `fetch_groups`
    pub fn write_calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| !matches!(call, RecordedCall::FetchGroups))
            .cloned()
            .collect()
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ClassifierError) {
        *self.next_failure.lock().unwrap() = Some(error);
    }

    /// Make the next create, update or delete fail with `error`
    pub fn fail_next_write(&self, error: ClassifierError) {
        *self.next_write_failure.lock().unwrap() = Some(error);
    }

    fn record(&self, call: RecordedCall) -> Result<(), ClassifierError> {
        let is_write = !matches!(call, RecordedCall::FetchGroups);
        self.calls.lock().unwrap().push(call);

        if let Some(error) = self.next_failure.lock().unwrap().take() {
            return Err(error);
        }
        if is_write {
            if let Some(error) = self.next_write_failure.lock().unwrap().take() {
                return Err(error);
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClassifierClientTrait for MockClassifierClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_token(&self) -> Result<(), ClassifierError> {
        Ok(())
    }

    async fn fetch_groups(&self) -> Result<Vec<NodeGroup>, ClassifierError> {
        self.record(RecordedCall::FetchGroups)?;
        Ok(self.groups())
    }

    async fn create_group(&self, payload: &NodeGroupPayload) -> Result<Option<String>, ClassifierError> {
        self.record(RecordedCall::Create(payload.clone()))?;

        let id = uuid::Uuid::new_v4().to_string();
        let group = NodeGroup {
            id: id.clone(),
            name: payload.name.clone().unwrap_or_default(),
            description: payload.description.clone(),
            environment: payload.environment.clone().unwrap_or_else(|| "production".to_string()),
            environment_trumps: payload.environment_trumps.unwrap_or(false),
            parent: payload.parent.clone(),
            rule: payload.rule.clone(),
            classes: payload.classes.clone().unwrap_or_default(),
            variables: payload.variables.clone().unwrap_or_default(),
            serial_number: Some(1),
        };
        self.groups.lock().unwrap().push(group);
        Ok(Some(id))
    }

    async fn update_group(&self, id: &str, payload: &NodeGroupPayload) -> Result<(), ClassifierError> {
        self.record(RecordedCall::Update(id.to_string(), payload.clone()))?;

        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = &payload.name {
            group.name = name.clone();
        }
        group.description = payload.description.clone();
        if let Some(environment) = &payload.environment {
            group.environment = environment.clone();
        }
        group.environment_trumps = payload.environment_trumps.unwrap_or(false);
        group.parent = payload.parent.clone();
        group.rule = payload.rule.clone();
        group.classes = payload.classes.clone().unwrap_or_default();
        group.variables = payload.variables.clone().unwrap_or_default();
        group.serial_number = group.serial_number.map(|n| n + 1);
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> Result<(), ClassifierError> {
        self.record(RecordedCall::Delete(id.to_string()))?;

        let mut groups = self.groups.lock().unwrap();
        let before = groups.len();
        groups.retain(|g| g.id != id);
        if groups.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

/// The classifier's answer for an unknown group id
fn not_found(id: &str) -> ClassifierError {
    let mut failure = ApiFailure::new("not-found", format!("Node group {} not found", id));
    failure.details.insert("id".to_string(), id.into());
    ClassifierError::NotFound(failure)
}
