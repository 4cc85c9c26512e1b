//! Error types for inventory discovery.
//!
//! Every failure in the pipeline is one of four categories. Each carries a
//! stable machine-readable kind tag that ends up in the `_error` output.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Result type alias using [`InventoryError`].
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Stable error category reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Http,
    Api,
    InvalidResponse,
}

impl ErrorKind {
    /// Kind tag emitted in the `_error.kind` field
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "bolt.plugin/validation-error",
            ErrorKind::Http => "bolt.plugin/azure-http-error",
            ErrorKind::Api => "bolt.plugin/azure-api-error",
            ErrorKind::InvalidResponse => "bolt.plugin/azure-response-error",
        }
    }
}

/// Errors that can occur while discovering targets.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input was incomplete or inconsistent. Raised before any network I/O.
    #[error("{message}")]
    Validation {
        message: String,
        /// Names of missing parameters, when that is the cause
        missing: Vec<&'static str>,
    },

    /// The remote host could not be reached.
    #[error("Failed to connect to {host}: {cause}")]
    Http { host: String, cause: String },

    /// The remote API answered with a non-success status.
    #[error("{status} \"{reason}\": {detail}")]
    Api {
        status: u16,
        reason: String,
        detail: String,
    },

    /// The remote API answered successfully but with a body we cannot use.
    #[error("Invalid response from {host}: {reason}")]
    InvalidResponse { host: String, reason: String },
}

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            missing: Vec::new(),
        }
    }

    /// Build an [`InventoryError::Http`] from a transport error.
    ///
    /// The request URL is stripped from the cause: Azure URLs embed the
    /// tenant and subscription identifiers.
    pub fn http(host: impl Into<String>, err: reqwest::Error) -> Self {
        Self::Http {
            host: host.into(),
            cause: cause_chain(&err.without_url()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::Validation { .. } => ErrorKind::Validation,
            InventoryError::Http { .. } => ErrorKind::Http,
            InventoryError::Api { .. } => ErrorKind::Api,
            InventoryError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    fn details(&self) -> Value {
        match self {
            InventoryError::Validation { missing, .. } if !missing.is_empty() => {
                json!({ "missing": missing })
            }
            InventoryError::Validation { .. } => json!({}),
            InventoryError::Http { host, .. } | InventoryError::InvalidResponse { host, .. } => {
                json!({ "host": host })
            }
            InventoryError::Api { status, .. } => json!({ "status": status }),
        }
    }

    /// Convert into the `_error` payload
    pub fn to_task_error(&self) -> TaskError {
        TaskError {
            msg: self.to_string(),
            kind: self.kind().as_str().to_string(),
            details: self.details(),
        }
    }
}

/// Render an error and its `source()` chain as `outer: inner: root`.
/// Layers that repeat the text of the layer above are skipped.
fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if parts.last().map_or(true, |last| !last.contains(&text)) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}

/// The `_error` object of a failed invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskError {
    pub msg: String,
    pub kind: String,
    pub details: Value,
}
