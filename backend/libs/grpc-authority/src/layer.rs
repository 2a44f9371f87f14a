//! Tower Middleware Interception
//!
//! Transport-level entry point for the gate: wraps a tonic server (or one
//! service) and runs the authority pipeline once per call, for unary and
//! streaming calls alike, before the inner service ever sees the request.

use crate::principal::BoundPrincipal;
use crate::Authority;
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tonic::metadata::MetadataMap;
use tower::{Layer, Service};

/// Tower layer applying an [`Authority`] to every call
///
/// The gRPC request URI path is the full method name
/// (`/package.Service/Method`), so the layer has everything the pipeline
/// needs: it converts the HTTP headers into call metadata, authenticates and
/// authorizes, and either forwards the request with the principal bound into
/// its extensions or responds immediately with the rejection status. The
/// inner service is never polled for a rejected call.
///
/// Streaming calls are authenticated once here, at call establishment:
/// authentication is a property of the call, not of each message flowing
/// through it.
///
/// ## Usage
///
/// ```ignore
/// use grpc_authority::{Authority, AuthorityLayer};
/// use tonic::transport::Server;
///
/// let authority = Authority::new(my_strategy);
///
/// Server::builder()
///     .layer(AuthorityLayer::new(authority))
///     .add_service(MyServiceServer::new(MyService))
///     .serve(addr)
///     .await?;
/// ```
#[derive(Clone)]
pub struct AuthorityLayer {
    authority: Authority,
}

impl AuthorityLayer {
    /// Wrap an authority as a tower layer
    pub fn new(authority: Authority) -> Self {
        Self { authority }
    }
}

impl<S> Layer<S> for AuthorityLayer {
    type Service = AuthorityService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthorityService {
            inner,
            authority: self.authority.clone(),
        }
    }
}

/// Service produced by [`AuthorityLayer`]
#[derive(Clone)]
pub struct AuthorityService<S> {
    inner: S,
    authority: Authority,
}

impl<S, B> Service<http::Request<B>> for AuthorityService<S>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let mut inner = self.inner.clone();
        let authority = self.authority.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();
            // The URI path of a gRPC request is the full method name.
            let method = parts.uri.path().to_owned();
            let metadata = MetadataMap::from_headers(parts.headers.clone());

            match authority.authorize(&metadata, &method).await {
                Ok(principal) => {
                    // tonic moves http extensions into the tonic::Request, so
                    // handlers recover the principal through PrincipalExt.
                    parts.extensions.insert(BoundPrincipal(principal));
                    inner.call(http::Request::from_parts(parts, body)).await
                }
                Err(status) => Ok(status.into_http()),
            }
        })
    }
}
