//! Azure Authentication
//!
//! Exchanges service principal credentials for a bearer token using the
//! OAuth2 client credentials grant.

use super::http::{host_of, AzureHttpClient};
use super::AzureEndpoints;
use crate::config::Credentials;
use crate::error::{InventoryError, Result};
use serde::Deserialize;
use std::fmt;

/// Resource the token is requested for
pub const MANAGEMENT_RESOURCE: &str = "https://management.azure.com";

/// Bearer token for the management API
#[derive(Clone, Deserialize)]
pub struct Token {
    pub token_type: String,
    pub access_token: String,
}

impl Token {
    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token_type", &self.token_type)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Request a token for the management API
pub async fn fetch_token(
    http: &AzureHttpClient,
    endpoints: &AzureEndpoints,
    creds: &Credentials,
) -> Result<Token> {
    let url = endpoints.token_url(&creds.tenant_id);
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("resource", MANAGEMENT_RESOURCE),
    ];

    let body = http.post_form(&url, &form).await?;
    let token: Token = serde_json::from_value(body).map_err(|e| InventoryError::InvalidResponse {
        host: host_of(&url),
        reason: format!("token response is missing fields: {}", e),
    })?;

    tracing::debug!("Acquired {} token", token.token_type);
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let token = Token {
            token_type: "Bearer".to_string(),
            access_token: "abc".to_string(),
        };
        assert_eq!(token.authorization(), "Bearer abc");
        assert!(!format!("{:?}", token).contains("abc"));
    }
}
