//! Node Classifier REST API Client
//!
//! A Rust client library for the Puppet Enterprise node classifier API.
//! Provides type-safe models and methods for managing node groups.
//!
//! # Example
//!
//! ```no_run
//! use classifier_client::{ClassifierClient, NodeGroupPayload};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = ClassifierClient::new(
//!     "https://puppet:4433".to_string(),
//!     "your-rbac-token".to_string(),
//! )?;
//!
//! // List node groups
//! let groups = client.fetch_groups().await?;
//!
//! // Create a node group under the root group
//! let payload = NodeGroupPayload {
//!     name: Some("Web Servers".to_string()),
//!     parent: groups.first().map(|g| g.id.clone()),
//!     environment: Some("production".to_string()),
//!     ..Default::default()
//! };
//! client.create_group(&payload).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Group Operations**: fetch, create, replace, delete
//! - **Structured Failures**: classifier error bodies decoded into [`ApiFailure`]
//! - **Mocking**: `test-util` feature exposes [`MockClassifierClient`]

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod classifier_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{ClassifierClient, ClientOptions};
pub use common::HttpClient;
pub use error::{ApiFailure, ClassifierError};
pub use models::*;
pub use classifier_trait::ClassifierClientTrait;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockClassifierClient, RecordedCall};
