//! Error types and wire payloads

use crate::Principal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::Status;
use tracing::warn;

/// Fixed message carried by every `Unauthenticated` rejection.
///
/// Deliberately constant and cause-free: callers cannot tell why
/// authentication failed, only that it did.
pub const UNAUTHENTICATED_MESSAGE: &str = r#"{"error": "no valid authorization metadata field"}"#;

/// Errors surfaced to handler code (never to the wire)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// Principal retrieval from a request this layer never authenticated
    #[error("cannot get principal from unauthenticated request")]
    UnauthenticatedContext,
}

impl From<AuthorityError> for Status {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::UnauthenticatedContext => {
                Status::unauthenticated(UNAUTHENTICATED_MESSAGE)
            }
        }
    }
}

/// Machine-parseable payload carried by every `PermissionDenied` rejection
///
/// Serialized with stable field order and camelCase names so client tooling
/// can rely on the exact shape:
/// `{"clientIdentifier":...,"permissionRequested":...,"clientPermissions":[...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDeniedDetail {
    /// Identifier of the rejected principal
    pub client_identifier: String,

    /// Full gRPC method name the principal attempted to call
    pub permission_requested: String,

    /// Every permission the principal held at the time of denial
    pub client_permissions: Vec<String>,
}

impl PermissionDeniedDetail {
    pub(crate) fn for_denial(principal: &Principal, method: &str) -> Self {
        Self {
            client_identifier: principal.client_identifier.clone(),
            permission_requested: method.to_owned(),
            client_permissions: principal.permissions.clone(),
        }
    }

    /// Render the denial as a `PermissionDenied` status.
    ///
    /// A serialization failure is logged and degraded to an empty message; it
    /// never prevents the already-decided rejection from being returned.
    pub(crate) fn into_status(self) -> Status {
        let message = match serde_json::to_string(&self) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize permission denial payload");
                String::new()
            }
        };
        Status::permission_denied(message)
    }
}
