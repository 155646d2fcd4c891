//! Declared node group state
//!
//! A [`NodeGroupDeclaration`] is built once, either through
//! [`NodeGroupDeclaration::builder`] or from a step file, and never changes
//! afterwards. It deliberately has no remote id: existence is looked up by
//! name on every reconciliation.

use crate::error::ControllerError;
use classifier_client::{Classes, Rule, Variables};
use serde::Deserialize;

/// Environment assigned when the declaration does not name one
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Desired state of one node group
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGroupDeclaration {
    name: String,
    description: Option<String>,
    environment: String,
    environment_trumps: Option<bool>,
    parent: Option<String>,
    rule: Option<Rule>,
    classes: Option<Classes>,
    variables: Option<Variables>,
    merge_classes: bool,
    merge_variables: bool,
}

impl NodeGroupDeclaration {
    /// Start a declaration for the group called `name`
    pub fn builder(name: impl Into<String>) -> NodeGroupDeclarationBuilder {
        NodeGroupDeclarationBuilder {
            declaration: Self {
                name: name.into(),
                description: None,
                environment: DEFAULT_ENVIRONMENT.to_string(),
                environment_trumps: None,
                parent: None,
                rule: None,
                classes: None,
                variables: None,
                merge_classes: false,
                merge_variables: false,
            },
        }
    }

    /// Group name; the identity used for every lookup
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Environment, `production` unless declared
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Declared environment-trumps flag
    pub fn environment_trumps(&self) -> Option<bool> {
        self.environment_trumps
    }

    /// Name of the group whose parent this group should share
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Declared matching rule
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    /// Declared classes; `None` when the caller did not declare any
    pub fn classes(&self) -> Option<&Classes> {
        self.classes.as_ref()
    }

    /// Declared variables; `None` when the caller did not declare any
    pub fn variables(&self) -> Option<&Variables> {
        self.variables.as_ref()
    }

    /// Whether declared classes are unioned with the remote classes
    pub fn merge_classes(&self) -> bool {
        self.merge_classes
    }

    /// Whether declared variables are unioned with the remote variables
    pub fn merge_variables(&self) -> bool {
        self.merge_variables
    }
}

/// Builder for [`NodeGroupDeclaration`]
#[derive(Debug, Clone)]
pub struct NodeGroupDeclarationBuilder {
    declaration: NodeGroupDeclaration,
}

impl NodeGroupDeclarationBuilder {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.declaration.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.declaration.environment = environment.into();
        self
    }

    #[must_use]
    pub fn environment_trumps(mut self, environment_trumps: bool) -> Self {
        self.declaration.environment_trumps = Some(environment_trumps);
        self
    }

    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.declaration.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.declaration.rule = Some(rule);
        self
    }

    #[must_use]
    pub fn classes(mut self, classes: Classes) -> Self {
        self.declaration.classes = Some(classes);
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: Variables) -> Self {
        self.declaration.variables = Some(variables);
        self
    }

    #[must_use]
    pub fn merge_classes(mut self, merge: bool) -> Self {
        self.declaration.merge_classes = merge;
        self
    }

    #[must_use]
    pub fn merge_variables(mut self, merge: bool) -> Self {
        self.declaration.merge_variables = merge;
        self
    }

    /// Finish the declaration
    pub fn build(self) -> NodeGroupDeclaration {
        self.declaration
    }
}

/// What a step does with its declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Set,
    Delete,
}

/// One entry of a step file
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub declaration: NodeGroupDeclaration,
    pub action: StepAction,
}

/// Step file entry as written by the pipeline author.
///
/// Accepts the pipeline DSL's camelCase spellings alongside snake_case.
/// Keys this step does not use (e.g. `credentials`) are ignored.
#[derive(Debug, Deserialize)]
struct StepEntry {
    name: String,
    description: Option<String>,
    environment: Option<String>,
    #[serde(alias = "environmentTrumps")]
    environment_trumps: Option<bool>,
    parent: Option<String>,
    rule: Option<Rule>,
    classes: Option<Classes>,
    variables: Option<Variables>,
    #[serde(default, alias = "mergeClasses")]
    merge_classes: bool,
    #[serde(default, alias = "mergeVariables")]
    merge_variables: bool,
    #[serde(default)]
    delete: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepDocument {
    Many(Vec<StepEntry>),
    One(StepEntry),
}

impl From<StepEntry> for Step {
    fn from(entry: StepEntry) -> Self {
        let mut builder = NodeGroupDeclaration::builder(entry.name)
            .merge_classes(entry.merge_classes)
            .merge_variables(entry.merge_variables);

        if let Some(description) = entry.description {
            builder = builder.description(description);
        }
        if let Some(environment) = entry.environment {
            builder = builder.environment(environment);
        }
        if let Some(environment_trumps) = entry.environment_trumps {
            builder = builder.environment_trumps(environment_trumps);
        }
        if let Some(parent) = entry.parent {
            builder = builder.parent(parent);
        }
        if let Some(rule) = entry.rule {
            builder = builder.rule(rule);
        }
        if let Some(classes) = entry.classes {
            builder = builder.classes(classes);
        }
        if let Some(variables) = entry.variables {
            builder = builder.variables(variables);
        }

        Step {
            declaration: builder.build(),
            action: if entry.delete { StepAction::Delete } else { StepAction::Set },
        }
    }
}

/// Parse a YAML (or JSON) step file holding one entry or a list of entries
pub fn parse_steps(contents: &str) -> Result<Vec<Step>, ControllerError> {
    let document: StepDocument = serde_yaml::from_str(contents)
        .map_err(|e| ControllerError::StepFile(e.to_string()))?;

    let steps: Vec<Step> = match document {
        StepDocument::Many(entries) => entries.into_iter().map(Step::from).collect(),
        StepDocument::One(entry) => vec![Step::from(entry)],
    };

    if steps.is_empty() {
        return Err(ControllerError::StepFile("step file declares no node groups".to_string()));
    }
    Ok(steps)
}
