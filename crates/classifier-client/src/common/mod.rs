//! Common utilities for the classifier API client
//!
//! Provides the authenticated request helpers shared by every endpoint.

use crate::error::{ApiFailure, ClassifierError};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Header carrying the RBAC token
pub const AUTH_HEADER: &str = "X-Authentication";

/// HTTP client wrapper with authentication
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<T, ClassifierError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self.client
            .get(&url)
            .header(AUTH_HEADER, &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ClassifierError::Http)?;

        let response = check_status(response, "GET", path).await?;

        // Keep the body for a useful message if it does not decode
        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            ClassifierError::InvalidRequest(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Make a POST request, returning the `Location` header if the service sent one
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<String>, ClassifierError> {
        let url = self.build_url(path);
        debug!("POST {} with body: {}", url, serde_json::to_string(body).unwrap_or_default());

        let response = self.client
            .post(&url)
            .header(AUTH_HEADER, &self.token)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ClassifierError::Http)?;

        let response = check_status(response, "POST", path).await?;
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(location)
    }

    /// Make a PUT request
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClassifierError> {
        let url = self.build_url(path);
        debug!("PUT {} with body: {}", url, serde_json::to_string(body).unwrap_or_default());

        let response = self.client
            .put(&url)
            .header(AUTH_HEADER, &self.token)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ClassifierError::Http)?;

        check_status(response, "PUT", path).await?;
        Ok(())
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), ClassifierError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self.client
            .delete(&url)
            .header(AUTH_HEADER, &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ClassifierError::Http)?;

        check_status(response, "DELETE", path).await?;
        Ok(())
    }
}

/// Map a non-success response to a `ClassifierError`.
///
/// `303 See Other` counts as success: the classifier answers a create with
/// a redirect to the new group.
async fn check_status(
    response: Response,
    method: &str,
    path: &str,
) -> Result<Response, ClassifierError> {
    let status = response.status();
    if status.is_success() || status == StatusCode::SEE_OTHER {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let failure = ApiFailure::from_body(&body);
    debug!("{} {} failed with {}: {}", method, path, status, failure);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ClassifierError::Authentication {
            status: status.as_u16(),
            failure,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ClassifierError::NotFound(failure));
    }

    Err(ClassifierError::Api {
        status: status.as_u16(),
        failure,
    })
}
