//! Configuration Management
//!
//! Handles the invocation options and credential resolution.

use crate::error::{InventoryError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Prefix of the environment variables consulted for missing credentials
pub const ENV_PREFIX: &str = "AZURE_";

/// Options supplied by the caller. Every field is independently optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryOptions {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub subscription_id: Option<String>,
    /// Narrow discovery to one resource group
    pub resource_group: Option<String>,
    /// Narrow discovery to one scale set (requires `resource_group`)
    pub scale_set: Option<String>,
    /// Keep only VMs in this location
    pub location: Option<String>,
    /// Keep only VMs carrying all of these tags
    pub tags: Option<HashMap<String, String>>,
}

/// Credentials for the Azure REST API
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

impl InventoryOptions {
    /// Resolve credentials (options > environment).
    ///
    /// `env` looks up a variable by name; missing keys are reported together.
    pub fn credentials<F>(&self, env: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &'static str, value: &Option<String>| {
            value
                .clone()
                .or_else(|| env(&format!("{}{}", ENV_PREFIX, key.to_uppercase())))
        };

        let tenant_id = lookup("tenant_id", &self.tenant_id);
        let client_id = lookup("client_id", &self.client_id);
        let client_secret = lookup("client_secret", &self.client_secret);
        let subscription_id = lookup("subscription_id", &self.subscription_id);

        match (tenant_id, client_id, client_secret, subscription_id) {
            (Some(tenant_id), Some(client_id), Some(client_secret), Some(subscription_id)) => {
                Ok(Credentials {
                    tenant_id,
                    client_id,
                    client_secret,
                    subscription_id,
                })
            }
            (tenant_id, client_id, client_secret, subscription_id) => {
                let missing: Vec<&'static str> = [
                    ("tenant_id", tenant_id.is_none()),
                    ("client_id", client_id.is_none()),
                    ("client_secret", client_secret.is_none()),
                    ("subscription_id", subscription_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();

                Err(InventoryError::Validation {
                    message: format!(
                        "Parameters {} must be specified or set as environment variables",
                        missing.join(", ")
                    ),
                    missing,
                })
            }
        }
    }

    /// Scale sets are addressed under their resource group
    pub fn validate(&self) -> Result<()> {
        if self.scale_set.is_some() && self.resource_group.is_none() {
            return Err(InventoryError::validation(
                "resource_group must be specified in order to filter by scale_set",
            ));
        }
        Ok(())
    }

    /// Load options from a JSON document
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content)
    }

    /// Load options from a YAML document
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Look up a variable in the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
