//! Authentication and Authorization Gate for gRPC Servers
//!
//! This library sits in front of a tonic server's method dispatch and
//! decides, per call, whether the caller is a recognized principal and
//! whether that principal may invoke the specific method being called. The
//! verified identity is bound to the call's request extensions for
//! downstream handlers; every failure becomes a protocol-correct status.
//!
//! ## Core Components
//!
//! - **Authority**: the authenticate-authorize-bind pipeline, composing the
//!   two strategies below
//! - **AuthenticationStrategy**: pluggable verification of call metadata into
//!   a [`Principal`]; integrate any credential scheme, from shared secrets
//!   to OAuth2 token introspection
//! - **PermissionStrategy**: pluggable decision of whether a principal's
//!   grants allow a method; [`MethodPermissions`] (the default) reads
//!   permissions as exact method names, [`NoPermissions`] gates on
//!   authentication alone
//! - **AuthorityLayer**: tower middleware applying the gate to every call,
//!   unary and streaming, once at call establishment
//! - **PrincipalExt**: request extension trait for recovering the caller
//!   identity in handlers
//!
//! ## Design
//!
//! - **Total**: every call terminates in a verified context or a well-formed
//!   rejection; there is no silent pass-through path
//! - **Cause-free rejections**: every authentication failure carries the same
//!   fixed message, so probing callers cannot learn why they were refused;
//!   causes go to the server-side log only
//! - **Parseable denials**: permission rejections carry a JSON payload with a
//!   stable shape for client tooling
//! - **Forgery-proof binding**: the extension entry holding the principal is
//!   a private type, so no outside code can inject one
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grpc_authority::{Authority, Principal, PrincipalExt};
//! use tonic::metadata::MetadataMap;
//! use tonic::{Request, Response, Status};
//!
//! // An authentication strategy is any function of the call metadata,
//! // or an implementation of AuthenticationStrategy for async verification.
//! fn api_keys(metadata: &MetadataMap) -> anyhow::Result<Principal> {
//!     let key = metadata
//!         .get("authorization")
//!         .and_then(|value| value.to_str().ok())
//!         .and_then(|value| value.strip_prefix("Bearer "))
//!         .ok_or_else(|| anyhow::anyhow!("missing bearer credential"))?;
//!     if key != "well-known-demo-key" {
//!         anyhow::bail!("unknown api key");
//!     }
//!     Ok(Principal::new(
//!         "demo-client",
//!         vec!["/demo.Echo/Say".to_string()],
//!     ))
//! }
//!
//! // In a handler, recover the identity the gate verified for this call.
//! async fn say(request: Request<()>) -> Result<Response<()>, Status> {
//!     let principal = request.principal()?;
//!     tracing::info!(client = %principal.client_identifier, "handling call");
//!     Ok(Response::new(()))
//! }
//!
//! let authority = Authority::new(api_keys);
//! ```
//!
//! Attach the gate to a server with [`AuthorityLayer`]:
//!
//! ```ignore
//! Server::builder()
//!     .layer(AuthorityLayer::new(authority))
//!     .add_service(EchoServer::new(EchoService))
//!     .serve(addr)
//!     .await?;
//! ```
//!
//! ## Security Guarantees
//!
//! - The permission strategy never runs before authentication succeeds
//! - A principal is bound only after both stages pass, never on a failure
//!   path, and only for the one call it was verified for
//! - No credential, token, or failure cause appears in a rejection
//! - Each call re-authenticates; nothing is cached across calls

mod authority;
mod error;
mod extensions;
mod layer;
mod principal;
mod strategy;

pub use authority::Authority;
pub use error::{AuthorityError, PermissionDeniedDetail, UNAUTHENTICATED_MESSAGE};
pub use extensions::PrincipalExt;
pub use layer::{AuthorityLayer, AuthorityService};
pub use principal::Principal;
pub use strategy::{AuthenticationStrategy, MethodPermissions, NoPermissions, PermissionStrategy};

// Re-export tonic Status for convenience
pub use tonic::Status;
