//! HTTP utilities for Azure REST API calls

use crate::error::{InventoryError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("azure-inventory/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Host part of a URL, used to name the remote side in errors and logs
pub fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "<invalid url>".to_string())
}

/// Pull a human readable message out of an Azure error body.
///
/// The token endpoint answers with `error_description`, the management API
/// with an `error` object carrying `message`.
pub fn extract_error_message(body: &Value) -> String {
    if let Some(description) = body.get("error_description").and_then(Value::as_str) {
        return description.to_string();
    }
    if let Some(message) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return message.to_string();
    }
    "Unknown error".to_string()
}

/// HTTP client wrapper for Azure API calls
#[derive(Clone)]
pub struct AzureHttpClient {
    client: Client,
}

impl AzureHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| InventoryError::Http {
                host: "local HTTP client".to_string(),
                cause: format!("failed to initialize: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Make an authenticated GET request. `authorization` is the full header value.
    pub async fn get(&self, url: &str, authorization: &str) -> Result<Value> {
        let host = host_of(url);
        tracing::debug!("GET {}", host);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| InventoryError::http(&host, e))?;

        Self::read_json(response, &host).await
    }

    /// Make a form-encoded POST request
    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Value> {
        let host = host_of(url);
        tracing::debug!("POST {}", host);

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| InventoryError::http(&host, e))?;

        Self::read_json(response, &host).await
    }

    async fn read_json(response: Response, host: &str) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InventoryError::http(host, e))?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error from {}: {} - {}", host, status, sanitize_for_log(&body));
            let detail = serde_json::from_str::<Value>(&body)
                .map(|v| extract_error_message(&v))
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InventoryError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| InventoryError::InvalidResponse {
            host: host.to_string(),
            reason: format!("failed to parse response JSON: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_error_description_first() {
        let body = json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        });
        assert_eq!(
            extract_error_message(&body),
            "AADSTS7000215: Invalid client secret provided."
        );
    }

    #[test]
    fn test_extract_nested_error_message() {
        let body = json!({
            "error": {
                "code": "ResourceGroupNotFound",
                "message": "Resource group 'missing' could not be found."
            }
        });
        assert_eq!(
            extract_error_message(&body),
            "Resource group 'missing' could not be found."
        );
    }

    #[test]
    fn test_extract_unknown_error() {
        assert_eq!(extract_error_message(&json!({"error": "nope"})), "Unknown error");
        assert_eq!(extract_error_message(&json!([])), "Unknown error");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://management.azure.com/subscriptions/x/providers"),
            "management.azure.com"
        );
        assert_eq!(host_of("not a url"), "<invalid url>");
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(200)));
        assert!(sanitized.contains("[truncated, 500 bytes total]"));
        assert_eq!(sanitize_for_log("a\nb"), "ab");
    }
}
