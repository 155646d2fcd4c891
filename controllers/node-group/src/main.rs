//! Node Group Controller
//!
//! Pipeline step that reconciles declared node groups against the Puppet
//! Enterprise node classifier:
//! - Declarations are read from a YAML/JSON step file
//! - Each declaration is created, replaced or deleted by name
//! - With no step file, the existing groups are listed
//!
//! Any classifier failure ends the step with an error so the build fails.

mod config;
mod declaration;
mod error;
mod notice;
mod reconciler;
#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::declaration::{StepAction, parse_steps};
use crate::error::ControllerError;
use crate::reconciler::{DeleteOutcome, NodeGroupReconciler, SetOutcome};
use classifier_client::{ClassifierClient, ClientOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Node Group Controller");

    let config = Config::from_env(std::env::args().nth(1))?;

    info!("Configuration:");
    info!("  Classifier URL: {}", config.classifier_url);
    info!("  Step file: {}", config.step_file.as_ref().map_or("none".to_string(), |p| p.display().to_string()));

    let options = ClientOptions {
        ca_cert_pem: match &config.ca_cert {
            Some(path) => Some(std::fs::read(path)?),
            None => None,
        },
        timeout: config.timeout,
    };
    let client = ClassifierClient::with_options(config.classifier_url.clone(), config.token.clone(), options)?;
    client.validate_token().await?;

    let reconciler = NodeGroupReconciler::new(Box::new(client));

    let Some(step_file) = &config.step_file else {
        for group in reconciler.get_groups().await? {
            info!("{} (ID: {}, parent: {})", group.name, group.id, group.parent.as_deref().unwrap_or("-"));
        }
        return Ok(());
    };

    let contents = std::fs::read_to_string(step_file)?;
    for step in parse_steps(&contents)? {
        match step.action {
            StepAction::Set => match reconciler.set(&step.declaration).await? {
                SetOutcome::Created { id } => info!(
                    "Node group {} created (ID: {})",
                    step.declaration.name(),
                    id.as_deref().unwrap_or("unknown")
                ),
                SetOutcome::Updated { id } => info!("Node group {} updated (ID: {})", step.declaration.name(), id),
            },
            StepAction::Delete => {
                if let DeleteOutcome::Deleted { id } = reconciler.delete(&step.declaration).await? {
                    info!("Node group {} deleted (ID: {})", step.declaration.name(), id);
                }
            }
        }
    }

    Ok(())
}
