//! Step configuration
//!
//! Everything is read from environment variables once at startup.

use crate::error::ControllerError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default classifier server root
pub const DEFAULT_CLASSIFIER_URL: &str = "https://puppet:4433";

/// Resolved step configuration
#[derive(Clone)]
pub struct Config {
    /// Classifier server root, without the API prefix
    pub classifier_url: String,
    /// RBAC token
    pub token: String,
    /// PEM bundle trusted in addition to the webpki roots
    pub ca_cert: Option<PathBuf>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// YAML/JSON file listing the declarations to apply
    pub step_file: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("classifier_url", &self.classifier_url)
            .field("token", &"<redacted>")
            .field("ca_cert", &self.ca_cert)
            .field("timeout", &self.timeout)
            .field("step_file", &self.step_file)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `step_arg` is the first command-line argument, which takes precedence
    /// over `NODE_GROUP_FILE`.
    pub fn from_env(step_arg: Option<String>) -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok(), step_arg)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, step_arg: Option<String>) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let classifier_url = lookup("CLASSIFIER_URL")
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string());

        let token = match lookup("PE_TOKEN") {
            Some(token) => token,
            None => {
                let path = lookup("PE_TOKEN_FILE").ok_or_else(|| ControllerError::InvalidConfig(
                    "PE_TOKEN or PE_TOKEN_FILE environment variable is required".to_string()
                ))?;
                std::fs::read_to_string(&path)
                    .map_err(|e| ControllerError::InvalidConfig(format!(
                        "Failed to read token file {}: {}", path, e
                    )))?
            }
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(ControllerError::InvalidConfig("RBAC token is empty".to_string()));
        }

        let timeout = match lookup("CLASSIFIER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ControllerError::InvalidConfig(format!(
                    "CLASSIFIER_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw
                )))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            classifier_url,
            token,
            ca_cert: lookup("PE_CA_CERT").map(PathBuf::from),
            timeout,
            step_file: step_arg.or_else(|| lookup("NODE_GROUP_FILE")).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("PE_TOKEN", "abc")]), None).unwrap();
        assert_eq!(config.classifier_url, DEFAULT_CLASSIFIER_URL);
        assert_eq!(config.token, "abc");
        assert!(config.timeout.is_none());
        assert!(config.step_file.is_none());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[]), None).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidConfig(_)));
    }

    #[test]
    fn test_token_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "from-file").unwrap();

        let config = Config::from_lookup(
            lookup_from(&[("PE_TOKEN_FILE", file.path().to_str().unwrap())]),
            None,
        )
        .unwrap();

        assert_eq!(config.token, "from-file");
    }

    #[test]
    fn test_step_argument_wins_over_env() {
        let config = Config::from_lookup(
            lookup_from(&[("PE_TOKEN", "abc"), ("NODE_GROUP_FILE", "env.yaml")]),
            Some("arg.yaml".to_string()),
        )
        .unwrap();
        assert_eq!(config.step_file, Some(PathBuf::from("arg.yaml")));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::from_lookup(lookup_from(&[("PE_TOKEN", "s3cr3t-rbac")]), None).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cr3t-rbac"));
        assert!(rendered.contains(DEFAULT_CLASSIFIER_URL));
    }

    #[test]
    fn test_bad_timeout() {
        let err = Config::from_lookup(
            lookup_from(&[("PE_TOKEN", "abc"), ("CLASSIFIER_TIMEOUT_SECS", "soon")]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ControllerError::InvalidConfig(_)));
    }
}
