//! Azure Client
//!
//! Combines endpoint configuration, authentication and the HTTP client.

use super::auth::{self, Token};
use super::http::AzureHttpClient;
use crate::config::Credentials;
use crate::error::Result;
use serde_json::Value;

/// Default Azure Active Directory authority
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Default Azure Resource Manager endpoint
pub const DEFAULT_MANAGEMENT: &str = "https://management.azure.com";

/// Base URLs of the services we talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureEndpoints {
    pub authority: String,
    pub management: String,
}

impl Default for AzureEndpoints {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            management: DEFAULT_MANAGEMENT.to_string(),
        }
    }
}

impl AzureEndpoints {
    /// Point both services at one base URL (used against mock servers)
    pub fn with_base(base: &str) -> Self {
        Self {
            authority: base.to_string(),
            management: base.to_string(),
        }
    }

    /// Build the OAuth2 token URL for a tenant
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority.trim_end_matches('/'),
            urlencoding::encode(tenant_id)
        )
    }

    /// Build a Resource Manager URL from a path
    pub fn management_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.management.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Main Azure client
#[derive(Clone)]
pub struct AzureClient {
    pub http: AzureHttpClient,
    pub endpoints: AzureEndpoints,
}

impl AzureClient {
    /// Create a client against the public Azure cloud
    pub fn new() -> Result<Self> {
        Self::with_endpoints(AzureEndpoints::default())
    }

    pub fn with_endpoints(endpoints: AzureEndpoints) -> Result<Self> {
        Ok(Self {
            http: AzureHttpClient::new()?,
            endpoints,
        })
    }

    /// Acquire a fresh token
    pub async fn token(&self, creds: &Credentials) -> Result<Token> {
        auth::fetch_token(&self.http, &self.endpoints, creds).await
    }

    /// Make an authenticated GET request
    pub async fn get(&self, url: &str, token: &Token) -> Result<Value> {
        self.http.get(url, &token.authorization()).await
    }

    /// Build a Resource Manager URL from a path
    pub fn management_url(&self, path: &str) -> String {
        self.endpoints.management_url(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_url() {
        let endpoints = AzureEndpoints::default();
        assert_eq!(
            endpoints.token_url("my-tenant"),
            "https://login.microsoftonline.com/my-tenant/oauth2/token"
        );
    }

    #[test]
    fn test_management_url_joins_slashes() {
        let endpoints = AzureEndpoints::with_base("http://127.0.0.1:8080/");
        assert_eq!(
            endpoints.management_url("/subscriptions/s"),
            "http://127.0.0.1:8080/subscriptions/s"
        );
    }
}
