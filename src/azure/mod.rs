//! Azure API interaction module
//!
//! This module provides the core functionality for talking to Azure Active
//! Directory and the Azure Resource Manager REST API.
//!
//! # Module Structure
//!
//! - [`auth`] - Client credentials grant against the token endpoint
//! - [`client`] - Endpoint configuration and URL helpers
//! - [`http`] - HTTP utilities and error classification
//!
//! # Example
//!
//! ```ignore
//! use azure_inventory::azure::{auth, AzureClient};
//!
//! async fn example(creds: &Credentials) -> azure_inventory::Result<()> {
//!     let client = AzureClient::new()?;
//!     let token = client.token(creds).await?;
//!     let page = client.get(&client.management_url("subscriptions"), &token).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

pub use auth::Token;
pub use client::{AzureClient, AzureEndpoints};
