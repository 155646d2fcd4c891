//! Classifier API client
//!
//! Implements the node classifier REST API client for group operations.
//! Based on the classifier v1 API structure: /classifier-api/v1/groups

use crate::classifier_trait::ClassifierClientTrait;
use crate::common::HttpClient;
use crate::error::ClassifierError;
use crate::models::{NodeGroup, NodeGroupPayload};
use reqwest::{Certificate, Client};
use std::time::Duration;
use tracing::debug;

/// Path prefix of the classifier v1 API
pub const API_PREFIX: &str = "/classifier-api/v1";

/// Transport options for [`ClassifierClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// PEM-encoded CA certificate to trust in addition to the bundled roots
    pub ca_cert_pem: Option<Vec<u8>>,
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

/// Classifier API client
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    http: HttpClient,
}

impl ClassifierClient {
    /// Create a new classifier client
    ///
    /// # Arguments
    /// * `server_url` - Classifier server root (e.g., "https://puppet:4433")
    /// * `token` - RBAC token for authentication
    pub fn new(server_url: String, token: String) -> Result<Self, ClassifierError> {
        Self::with_options(server_url, token, ClientOptions::default())
    }

    /// Create a new classifier client with transport options
    pub fn with_options(
        server_url: String,
        token: String,
        options: ClientOptions,
    ) -> Result<Self, ClassifierError> {
        // Creates answer with 303; the redirect target is not needed
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::none());

        if let Some(pem) = &options.ca_cert_pem {
            let cert = Certificate::from_pem(pem).map_err(|e| {
                ClassifierError::InvalidRequest(format!("Invalid CA certificate: {}", e))
            })?;
            builder = builder.add_root_certificate(cert);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(ClassifierError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, api_base_url(&server_url), token),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Validate the API token by making an authenticated request.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and the classifier is reachable
    /// * `Err(ClassifierError)` - Token is invalid or the classifier is unreachable
    pub async fn validate_token(&self) -> Result<(), ClassifierError> {
        debug!("Validating classifier token and connectivity");
        let _: serde_json::Value = self.http.get("/groups").await?;
        debug!("Token validated successfully");
        Ok(())
    }

    /// Fetch every node group
    ///
    /// # Returns
    /// * `Ok(Vec<NodeGroup>)` - All groups, in the order the service returned them
    /// * `Err(ClassifierError)` - If the request fails
    pub async fn fetch_groups(&self) -> Result<Vec<NodeGroup>, ClassifierError> {
        debug!("Fetching node groups from classifier");
        let groups: Vec<NodeGroup> = self.http.get("/groups").await?;
        debug!("Fetched {} node groups", groups.len());
        Ok(groups)
    }

    /// Create a node group
    ///
    /// # Returns
    /// * `Ok(Some(id))` - The new group id, taken from the `Location` header
    /// * `Ok(None)` - Created, but the service did not report the id
    /// * `Err(ClassifierError)` - If creation fails
    pub async fn create_group(&self, payload: &NodeGroupPayload) -> Result<Option<String>, ClassifierError> {
        debug!("Creating node group {:?}", payload.name);
        let location = self.http.post("/groups", payload).await?;
        Ok(location.as_deref().and_then(id_from_location))
    }

    /// Replace an existing node group
    ///
    /// # Arguments
    /// * `id` - Group id
    /// * `payload` - Full group document; the service replaces every field
    pub async fn update_group(&self, id: &str, payload: &NodeGroupPayload) -> Result<(), ClassifierError> {
        debug!("Updating node group {}", id);
        self.http.put(&group_path(id), payload).await
    }

    /// Delete a node group
    pub async fn delete_group(&self, id: &str) -> Result<(), ClassifierError> {
        debug!("Deleting node group {}", id);
        self.http.delete(&group_path(id)).await
    }
}

fn api_base_url(server_url: &str) -> String {
    let trimmed = server_url.trim_end_matches('/');
    if trimmed.ends_with(API_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_PREFIX)
    }
}

fn group_path(id: &str) -> String {
    format!("/groups/{}", urlencoding::encode(id))
}

fn id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && *segment != "groups")
        .map(str::to_string)
}

#[async_trait::async_trait]
impl ClassifierClientTrait for ClassifierClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn validate_token(&self) -> Result<(), ClassifierError> {
        self.validate_token().await
    }

    async fn fetch_groups(&self) -> Result<Vec<NodeGroup>, ClassifierError> {
        self.fetch_groups().await
    }

    async fn create_group(&self, payload: &NodeGroupPayload) -> Result<Option<String>, ClassifierError> {
        self.create_group(payload).await
    }

    async fn update_group(&self, id: &str, payload: &NodeGroupPayload) -> Result<(), ClassifierError> {
        self.update_group(id, payload).await
    }

    async fn delete_group(&self, id: &str) -> Result<(), ClassifierError> {
        self.delete_group(id).await
    }
}
