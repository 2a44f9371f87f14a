//! Principal Retrieval
//!
//! Recovers the caller identity bound by the authority from a request, for
//! use by downstream handlers.

use crate::error::AuthorityError;
use crate::principal::BoundPrincipal;
use crate::Principal;
use tonic::Request;

/// Extension trait for reading the authenticated principal of a request
///
/// Implemented for `tonic::Request<T>` and `http::Request<B>`, so both
/// generated tonic services and hand-written tower services can recover the
/// caller identity the gate verified for this call.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_authority::PrincipalExt;
/// use tonic::{Request, Response, Status};
///
/// async fn delete_post(request: Request<()>) -> Result<Response<()>, Status> {
///     // Fails with Status::unauthenticated if the gate never ran
///     let principal = request.principal()?;
///
///     if principal.client_identifier != "expected-owner" {
///         return Err(Status::permission_denied("not the resource owner"));
///     }
///
///     Ok(Response::new(()))
/// }
/// ```
pub trait PrincipalExt {
    /// The principal the authority bound to this call
    ///
    /// ## Errors
    ///
    /// Returns [`AuthorityError::UnauthenticatedContext`] for a request the
    /// gate never authenticated, including one rejected by it. Never panics
    /// on an untouched request. The error converts into
    /// `Status::unauthenticated`, so handlers can use `?` directly.
    fn principal(&self) -> Result<&Principal, AuthorityError>;
}

impl<T> PrincipalExt for Request<T> {
    fn principal(&self) -> Result<&Principal, AuthorityError> {
        self.extensions()
            .get::<BoundPrincipal>()
            .map(|bound| &bound.0)
            .ok_or(AuthorityError::UnauthenticatedContext)
    }
}

impl<B> PrincipalExt for http::Request<B> {
    fn principal(&self) -> Result<&Principal, AuthorityError> {
        self.extensions()
            .get::<BoundPrincipal>()
            .map(|bound| &bound.0)
            .ok_or(AuthorityError::UnauthenticatedContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_request_yields_sentinel_error() {
        let request = Request::new(());
        let err = request.principal().expect_err("no principal bound");
        assert_eq!(err, AuthorityError::UnauthenticatedContext);
    }

    #[test]
    fn test_bound_principal_is_returned_intact() {
        let principal = Principal::new("client-1", vec!["/svc.Service/Method".to_string()]);
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(BoundPrincipal(principal.clone()));

        let retrieved = request.principal().expect("principal bound");
        assert_eq!(retrieved, &principal);
    }

    #[test]
    fn test_http_requests_are_supported() {
        let request = http::Request::new(());
        let err = request.principal().expect_err("no principal bound");
        assert_eq!(err, AuthorityError::UnauthenticatedContext);
    }
}
