//! Node group reconciliation.
//!
//! Every call starts from a fresh fetch of the classifier's group list and
//! resolves identity by exact, case-sensitive name. Nothing is cached between
//! calls, so two invocations never share state.

use crate::declaration::NodeGroupDeclaration;
use crate::error::ControllerError;
use crate::notice::{NoticeSink, TracingSink};
use classifier_client::{ClassifierClientTrait, NodeGroup, NodeGroupPayload, Variables};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of [`NodeGroupReconciler::set`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// A new group was created
    Created {
        /// Id of the new group; present when the service reported it
        id: Option<String>,
    },
    /// An existing group was replaced
    Updated {
        /// Id of the replaced group
        id: String,
    },
}

/// Result of [`NodeGroupReconciler::delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The group was deleted
    Deleted {
        /// Id of the deleted group
        id: String,
    },
    /// No group carried the declared name; nothing was sent
    Skipped,
}

/// Reconciles declared node groups against the classifier.
pub struct NodeGroupReconciler {
    client: Box<dyn ClassifierClientTrait + Send + Sync>,
    notices: Arc<dyn NoticeSink>,
}

impl std::fmt::Debug for NodeGroupReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeGroupReconciler")
            .field("base_url", &self.client.base_url())
            .field("notices", &self.notices)
            .finish()
    }
}

impl NodeGroupReconciler {
    /// Create a reconciler that writes notices through `tracing`
    pub fn new(client: Box<dyn ClassifierClientTrait + Send + Sync>) -> Self {
        Self::with_notices(client, Arc::new(TracingSink))
    }

    /// Create a reconciler with a custom notice sink
    pub fn with_notices(
        client: Box<dyn ClassifierClientTrait + Send + Sync>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self { client, notices }
    }

    /// Fetch the full group collection
    pub async fn get_groups(&self) -> Result<Vec<NodeGroup>, ControllerError> {
        self.client.fetch_groups().await.map_err(|e| {
            error!("Failed to fetch node groups from {}: {}", self.client.base_url(), e);
            ControllerError::Classifier(e)
        })
    }

    /// Bring the remote group in line with `declaration`, creating it if needed.
    pub async fn set(&self, declaration: &NodeGroupDeclaration) -> Result<SetOutcome, ControllerError> {
        let name = declaration.name();
        info!("Reconciling node group {}", name);

        let parent = match declaration.parent() {
            Some(parent_name) => self.resolve_parent(name, parent_name).await?,
            None => None,
        };

        let groups = self.get_groups().await?;

        match find_group(&groups, name) {
            Some(existing) => {
                let payload = update_payload(declaration, parent, existing);
                debug!("Node group {} exists (ID: {}), replacing", name, existing.id);

                if let Err(e) = self.client.update_group(&existing.id, &payload).await {
                    error!("Failed to update node group {} (ID: {}): {}", name, existing.id, e);
                    return Err(ControllerError::Classifier(e));
                }

                info!("Updated node group {} (ID: {})", name, existing.id);
                Ok(SetOutcome::Updated { id: existing.id.clone() })
            }
            None => {
                let payload = create_payload(declaration, parent);
                debug!("Node group {} not found, creating", name);

                let id = match self.client.create_group(&payload).await {
                    Ok(id) => id,
                    Err(e) => {
                        error!("Failed to create node group {}: {}", name, e);
                        return Err(ControllerError::Classifier(e));
                    }
                };

                info!("Created node group {} (ID: {})", name, id.as_deref().unwrap_or("unknown"));
                Ok(SetOutcome::Created { id })
            }
        }
    }

    /// Delete the group named by `declaration`, if it exists.
    pub async fn delete(&self, declaration: &NodeGroupDeclaration) -> Result<DeleteOutcome, ControllerError> {
        let name = declaration.name();
        let groups = self.get_groups().await?;

        let Some(id) = find_group_id(&groups, name) else {
            self.notices
                .notice(&format!("Node group {} was not found. Skipping delete.", name));
            return Ok(DeleteOutcome::Skipped);
        };

        if let Err(e) = self.client.delete_group(id).await {
            error!("Failed to delete node group {} (ID: {}): {}", name, id, e);
            return Err(ControllerError::Classifier(e));
        }

        info!("Deleted node group {} (ID: {})", name, id);
        Ok(DeleteOutcome::Deleted { id: id.to_string() })
    }

    /// Resolve a declared parent name to a parent id.
    ///
    /// The result is the *parent* of the group called `parent_name`, so the
    /// reconciled group becomes a sibling of that group. An unknown name, or a
    /// match without a parent, leaves the parent unresolved.
    async fn resolve_parent(&self, name: &str, parent_name: &str) -> Result<Option<String>, ControllerError> {
        let groups = self.get_groups().await?;

        match find_group(&groups, parent_name) {
            Some(group) if group.parent.is_some() => {
                debug!(
                    "Resolved parent '{}' of node group {} to {:?}",
                    parent_name, name, group.parent
                );
                Ok(group.parent.clone())
            }
            Some(_) => {
                warn!("Parent group '{}' of node group {} has no parent id, leaving parent unset", parent_name, name);
                Ok(None)
            }
            None => {
                warn!("Parent group '{}' of node group {} not found, leaving parent unset", parent_name, name);
                Ok(None)
            }
        }
    }
}

/// First group whose name equals `name` exactly.
///
/// Logs a warning when the collection holds more than one match.
pub fn find_group<'a>(groups: &'a [NodeGroup], name: &str) -> Option<&'a NodeGroup> {
    let mut matches = groups.iter().filter(|g| g.name == name);
    let first = matches.next()?;

    let extra = matches.count();
    if extra > 0 {
        warn!(
            "{} node groups are named '{}', using the first (ID: {})",
            extra + 1, name, first.id
        );
    }
    Some(first)
}

/// Id of the first group whose name equals `name` exactly
pub fn find_group_id<'a>(groups: &'a [NodeGroup], name: &str) -> Option<&'a str> {
    find_group(groups, name).map(|g| g.id.as_str())
}

/// Payload for a group that does not exist yet.
///
/// Optional fields are sent only when declared; classes and variables
/// default to empty maps.
pub fn create_payload(declaration: &NodeGroupDeclaration, parent: Option<String>) -> NodeGroupPayload {
    NodeGroupPayload {
        id: None,
        name: Some(declaration.name().to_string()),
        description: declaration.description().map(str::to_string),
        environment: Some(declaration.environment().to_string()),
        environment_trumps: declaration.environment_trumps(),
        parent,
        rule: declaration.rule().cloned(),
        classes: Some(declaration.classes().cloned().unwrap_or_default()),
        variables: Some(declaration.variables().cloned().unwrap_or_default()),
    }
}

/// Full replacement payload for `existing`.
///
/// Each field takes the declared value when there is one and the remote
/// value otherwise. Declared classes and variables are unioned with the
/// remote ones when the matching merge flag is set, declared keys winning.
pub fn update_payload(
    declaration: &NodeGroupDeclaration,
    parent: Option<String>,
    existing: &NodeGroup,
) -> NodeGroupPayload {
    let classes = match declaration.classes() {
        Some(declared) if declaration.merge_classes() => merge(&existing.classes, declared),
        Some(declared) => declared.clone(),
        None => existing.classes.clone(),
    };

    let variables: Variables = match declaration.variables() {
        Some(declared) if declaration.merge_variables() => merge(&existing.variables, declared),
        Some(declared) => declared.clone(),
        None => existing.variables.clone(),
    };

    NodeGroupPayload {
        id: Some(existing.id.clone()),
        name: Some(declaration.name().to_string()),
        description: declaration
            .description()
            .map(str::to_string)
            .or_else(|| existing.description.clone()),
        environment: Some(declaration.environment().to_string()),
        environment_trumps: Some(declaration.environment_trumps().unwrap_or(existing.environment_trumps)),
        parent: parent.or_else(|| existing.parent.clone()),
        rule: declaration.rule().cloned().or_else(|| existing.rule.clone()),
        classes: Some(classes),
        variables: Some(variables),
    }
}

/// Shallow union of two maps; keys in `declared` overwrite keys in `remote`
fn merge<V: Clone>(
    remote: &BTreeMap<String, V>,
    declared: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    let mut merged = remote.clone();
    merged.extend(declared.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
