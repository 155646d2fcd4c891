//! ClassifierClient trait for mocking
//!
//! This trait abstracts the ClassifierClient so reconcilers can be unit tested.
//! The concrete ClassifierClient implements it, and tests use MockClassifierClient.

use crate::error::ClassifierError;
use crate::models::{NodeGroup, NodeGroupPayload};

/// Trait for node classifier group operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClassifierClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API token
    async fn validate_token(&self) -> Result<(), ClassifierError>;

    /// Fetch every node group, in service order
    async fn fetch_groups(&self) -> Result<Vec<NodeGroup>, ClassifierError>;

    /// Create a node group, returning the new id when the service reports it
    async fn create_group(&self, payload: &NodeGroupPayload) -> Result<Option<String>, ClassifierError>;

    /// Replace the node group with the given id
    async fn update_group(&self, id: &str, payload: &NodeGroupPayload) -> Result<(), ClassifierError>;

    /// Delete the node group with the given id
    async fn delete_group(&self, id: &str) -> Result<(), ClassifierError>;
}
