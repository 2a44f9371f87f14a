//! Verified Caller Identity
//!
//! Defines the principal record produced by an authentication strategy and
//! bound to a call's request extensions by the authority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The verified identity and permission set of one authenticated call
///
/// Produced exclusively by an authentication strategy, attached to the
/// request by the [`Authority`](crate::Authority), and dropped when the call
/// completes. Nothing is cached across calls: every call re-authenticates.
///
/// ## Design Notes
///
/// - Fields are public for direct access (no getter boilerplate)
/// - `authenticated_at` is informational; this layer never uses it for expiry
/// - Permission strings are opaque here; the default permission strategy
///   treats them as full gRPC method names (`/package.Service/Method`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque identifier, unique per authenticated entity
    pub client_identifier: String,

    /// When the authentication strategy verified this caller
    pub authenticated_at: DateTime<Utc>,

    /// Permission strings granted to the caller (order-irrelevant, may be empty)
    pub permissions: Vec<String>,
}

impl Principal {
    /// Create a principal verified at the current instant
    pub fn new(client_identifier: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            client_identifier: client_identifier.into(),
            authenticated_at: Utc::now(),
            permissions,
        }
    }

    /// Check whether a permission string was granted (exact match)
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|granted| granted == permission)
    }
}

/// Extension entry wrapping the principal bound by the authority.
///
/// Kept private so no outside caller can insert a colliding entry and forge
/// an authenticated principal; retrieval goes through the public extension
/// trait instead.
#[derive(Debug, Clone)]
pub(crate) struct BoundPrincipal(pub(crate) Principal);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_verification_time() {
        let before = Utc::now();
        let principal = Principal::new("client-1", vec!["/svc.Service/Method".to_string()]);
        let after = Utc::now();

        assert_eq!(principal.client_identifier, "client-1");
        assert!(principal.authenticated_at >= before);
        assert!(principal.authenticated_at <= after);
    }

    #[test]
    fn test_has_permission_exact_match_only() {
        let principal = Principal::new("client-1", vec!["/svc.Service/Method".to_string()]);

        assert!(principal.has_permission("/svc.Service/Method"));
        assert!(!principal.has_permission("/svc.Service/Other"));
        // No prefix or wildcard semantics
        assert!(!principal.has_permission("/svc.Service/"));
        assert!(!principal.has_permission("/svc.Service/Method/Sub"));
    }

    #[test]
    fn test_empty_permission_set_grants_nothing() {
        let principal = Principal::new("client-1", Vec::new());
        assert!(!principal.has_permission("/svc.Service/Method"));
    }
}
