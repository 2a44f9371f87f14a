//! Authenticate-Authorize Pipeline
//!
//! The authority owns the authentication and permission strategies and runs
//! the complete gate for one call: extract metadata, verify the caller,
//! evaluate permissions against the target method, bind the verified
//! principal to the request, and translate every failure into a
//! protocol-correct status.

use crate::error::{PermissionDeniedDetail, UNAUTHENTICATED_MESSAGE};
use crate::principal::BoundPrincipal;
use crate::strategy::{AuthenticationStrategy, MethodPermissions, PermissionStrategy};
use crate::Principal;
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tonic::{Request, Status};
use tracing::{debug, warn};

/// Authentication/authorization gate in front of gRPC method dispatch
///
/// An `Authority` decides, per call, whether the caller is a recognized
/// principal and whether that principal may invoke the target method. The
/// decision pipeline is total: every call ends in exactly one of
///
/// 1. proceed, with the principal bound to the request extensions,
/// 2. `Status::unauthenticated` with a fixed, cause-free message, or
/// 3. `Status::permission_denied` with a machine-parseable JSON payload.
///
/// ## Design
///
/// - **Required authentication strategy**: an `Authority` cannot be built
///   without one; omitting it is a compile error, not a runtime condition
/// - **Optional permission strategy**: defaults to [`MethodPermissions`],
///   which reads permissions as the exact method names a client may call
/// - **Information hiding**: authentication failure causes are logged at
///   WARN, never surfaced to the caller
/// - **No shared mutable state**: the strategies are held behind `Arc` and
///   invoked concurrently; cloning an `Authority` is cheap and shares them
/// - **No internal timeout**: a blocking strategy is bounded only by the
///   surrounding call deadline
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_authority::{Authority, Principal};
/// use tonic::metadata::MetadataMap;
///
/// fn shared_secret(metadata: &MetadataMap) -> anyhow::Result<Principal> {
///     let token = metadata
///         .get("authorization")
///         .and_then(|value| value.to_str().ok())
///         .and_then(|value| value.strip_prefix("Bearer "))
///         .ok_or_else(|| anyhow::anyhow!("missing bearer credential"))?;
///     if token != "local-dev-secret" {
///         anyhow::bail!("unrecognized credential");
///     }
///     Ok(Principal::new(
///         "local-dev",
///         vec!["/demo.Echo/Say".to_string()],
///     ))
/// }
///
/// let authority = Authority::new(shared_secret);
/// ```
#[derive(Clone)]
pub struct Authority {
    strategy: Arc<dyn AuthenticationStrategy>,
    permissions: Arc<dyn PermissionStrategy>,
    require_single_authorization: bool,
}

impl Authority {
    /// Create an authority around the given authentication strategy
    ///
    /// The permission strategy defaults to [`MethodPermissions`].
    pub fn new(strategy: impl AuthenticationStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
            permissions: Arc::new(MethodPermissions),
            require_single_authorization: false,
        }
    }

    /// Replace the default permission strategy
    pub fn with_permission_strategy(
        mut self,
        permissions: impl PermissionStrategy + 'static,
    ) -> Self {
        self.permissions = Arc::new(permissions);
        self
    }

    /// Reject calls that do not carry exactly one `authorization` value
    ///
    /// Off by default: malformed or absent credentials are then the
    /// authentication strategy's judgment. Enabling this pre-validation
    /// rejects zero or multiple `authorization` values before the strategy
    /// runs, with the same fixed `Unauthenticated` message as any other
    /// authentication failure.
    pub fn require_single_authorization(mut self, require: bool) -> Self {
        self.require_single_authorization = require;
        self
    }

    /// Authenticate and authorize one call
    ///
    /// `method` is the full gRPC method name, `/package.Service/Method`.
    /// Returns the verified principal, or the status to reject the call
    /// with. The permission strategy runs only after authentication has
    /// succeeded.
    ///
    /// ## Errors
    ///
    /// - `Status::unauthenticated` with [`UNAUTHENTICATED_MESSAGE`] for any
    ///   authentication failure, identical regardless of cause
    /// - `Status::permission_denied` with the serialized
    ///   [`PermissionDeniedDetail`] when the principal lacks the method
    pub async fn authorize(
        &self,
        metadata: &MetadataMap,
        method: &str,
    ) -> Result<Principal, Status> {
        if self.require_single_authorization {
            let values = metadata.get_all("authorization").iter().count();
            if values != 1 {
                warn!(
                    values,
                    method = %method,
                    "rejecting call without exactly one authorization value"
                );
                return Err(Status::unauthenticated(UNAUTHENTICATED_MESSAGE));
            }
        }

        let principal = match self.strategy.authenticate(metadata).await {
            Ok(principal) => principal,
            Err(err) => {
                // The cause stays server-side; the caller sees the fixed message.
                warn!(error = %err, method = %method, "error authenticating client");
                return Err(Status::unauthenticated(UNAUTHENTICATED_MESSAGE));
            }
        };

        if !self.permissions.allows(&principal.permissions, method) {
            warn!(
                client = %principal.client_identifier,
                method = %method,
                "client does not have permission to access method"
            );
            return Err(PermissionDeniedDetail::for_denial(&principal, method).into_status());
        }

        debug!(
            client = %principal.client_identifier,
            permissions = ?principal.permissions,
            "successfully authenticated client"
        );
        Ok(principal)
    }

    /// Run the gate against a request and bind the principal on success
    ///
    /// The request value is consumed and returned augmented; nothing is
    /// mutated behind a shared reference. Works for unary (`Request<M>`) and
    /// client/bidi streaming (`Request<Streaming<M>>`) request shapes alike;
    /// for streams the check happens once here, at call establishment, not
    /// per message. On failure the caller must return the status without
    /// invoking the handler.
    ///
    /// For whole-server interception use
    /// [`AuthorityLayer`](crate::AuthorityLayer), which applies this same
    /// pipeline to every call from the transport side.
    pub async fn intercept<T>(
        &self,
        mut request: Request<T>,
        method: &str,
    ) -> Result<Request<T>, Status> {
        let principal = self.authorize(request.metadata(), method).await?;
        request.extensions_mut().insert(BoundPrincipal(principal));
        Ok(request)
    }
}
