//! Strategy Contracts
//!
//! The two pluggable capabilities an integrator supplies to an
//! [`Authority`](crate::Authority): identity verification and permission
//! evaluation. Both are blanket-implemented for plain functions so simple
//! strategies stay function-shaped; providers that need async I/O (token
//! introspection, JWKS fetches) implement [`AuthenticationStrategy`]
//! directly.

use crate::Principal;
use async_trait::async_trait;
use tonic::metadata::MetadataMap;

/// Verifies one call's metadata and produces a [`Principal`]
///
/// Implementations may read any metadata entry, though `authorization` is the
/// conventional bearer-credential carrier. A failure of any kind (missing
/// header, malformed credential, expired token, provider unreachable) is
/// collapsed by the authority into one fixed `Unauthenticated` rejection; the
/// underlying error is only logged server-side.
///
/// Invoked once per call, concurrently across calls: implementations must
/// hold any shared caches or network clients in a thread-safe way. The
/// authority imposes no timeout of its own; the surrounding call deadline is
/// the only cancellation source.
#[async_trait]
pub trait AuthenticationStrategy: Send + Sync {
    /// Verify the caller behind `metadata`
    async fn authenticate(&self, metadata: &MetadataMap) -> anyhow::Result<Principal>;
}

/// Plain functions are authentication strategies
///
/// Lets local verification schemes (shared secrets, static API keys) be
/// passed as ordinary functions without the async machinery.
#[async_trait]
impl<F> AuthenticationStrategy for F
where
    F: Fn(&MetadataMap) -> anyhow::Result<Principal> + Send + Sync,
{
    async fn authenticate(&self, metadata: &MetadataMap) -> anyhow::Result<Principal> {
        self(metadata)
    }
}

/// Decides whether a principal's grants allow invoking a method
///
/// Evaluated only after authentication has succeeded, on every call, so
/// implementations must be total (never fail) and fast. `method` is the full
/// gRPC method name, `/package.Service/Method`.
pub trait PermissionStrategy: Send + Sync {
    /// Return `true` to authorize the call, `false` to deny it
    fn allows(&self, permissions: &[String], method: &str) -> bool;
}

impl<F> PermissionStrategy for F
where
    F: Fn(&[String], &str) -> bool + Send + Sync,
{
    fn allows(&self, permissions: &[String], method: &str) -> bool {
        self(permissions, method)
    }
}

/// Default permission strategy: permissions are exactly the method names a
/// client may call
///
/// A principal is authorized for method `M` iff `M` appears verbatim in its
/// permission set. No wildcards, no prefix matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodPermissions;

impl PermissionStrategy for MethodPermissions {
    fn allows(&self, permissions: &[String], method: &str) -> bool {
        permissions.iter().any(|permission| permission == method)
    }
}

/// Permission strategy for deployments where authentication alone gates
/// access
///
/// Authorizes any principal whose permission set is empty and denies any
/// principal that presents permissions: a caller carrying grants under this
/// policy is treated as a mismatch with the deployment, not as a broader
/// allowance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermissions;

impl PermissionStrategy for NoPermissions {
    fn allows(&self, permissions: &[String], _method: &str) -> bool {
        permissions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHOD: &str = "/svc.Service/Method";

    fn perms(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_method_permissions_requires_exact_membership() {
        let strategy = MethodPermissions;

        assert!(strategy.allows(&perms(&[METHOD]), METHOD));
        assert!(strategy.allows(&perms(&["/svc.Service/Other", METHOD]), METHOD));
        assert!(!strategy.allows(&perms(&["/svc.Service/Other"]), METHOD));
        assert!(!strategy.allows(&perms(&[]), METHOD));
        // Prefixes are not grants
        assert!(!strategy.allows(&perms(&["/svc.Service/"]), METHOD));
    }

    #[test]
    fn test_no_permissions_allows_only_empty_sets() {
        let strategy = NoPermissions;

        assert!(strategy.allows(&perms(&[]), METHOD));
        assert!(strategy.allows(&perms(&[]), "/any.Service/AtAll"));
        // A client presenting permissions does not match this policy
        assert!(!strategy.allows(&perms(&[METHOD]), METHOD));
        assert!(!strategy.allows(&perms(&["/svc.Service/Other"]), METHOD));
    }

    #[test]
    fn test_closures_are_permission_strategies() {
        fn deny_all(_permissions: &[String], _method: &str) -> bool {
            false
        }

        assert!(!deny_all.allows(&perms(&[METHOD]), METHOD));
    }

    #[tokio::test]
    async fn test_functions_are_authentication_strategies() {
        fn static_client(_metadata: &MetadataMap) -> anyhow::Result<Principal> {
            Ok(Principal::new("static", Vec::new()))
        }

        let principal = static_client
            .authenticate(&MetadataMap::new())
            .await
            .expect("static strategy always verifies");
        assert_eq!(principal.client_identifier, "static");
    }
}
