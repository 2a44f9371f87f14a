//! Basic usage example of grpc-authority
//!
//! This example demonstrates how to:
//! 1. Build an Authority from a function-shaped authentication strategy
//! 2. Run calls through the interception pipeline
//! 3. Recover the verified principal the way a handler would
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use grpc_authority::{Authority, Principal, PrincipalExt};
use tonic::metadata::MetadataMap;
use tonic::Request;

/// Toy strategy: one well-known API key, granted one method.
fn demo_api_keys(metadata: &MetadataMap) -> anyhow::Result<Principal> {
    let key = metadata
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| anyhow::anyhow!("missing bearer credential"))?;

    if key != "demo-key" {
        anyhow::bail!("unknown api key");
    }

    Ok(Principal::new(
        "demo-client",
        vec!["/demo.Echo/Say".to_string()],
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing so the gate's server-side log lines are visible
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let authority = Authority::new(demo_api_keys);

    // A call with a recognized credential, to a granted method
    let mut request = Request::new(());
    request
        .metadata_mut()
        .insert("authorization", "Bearer demo-key".parse()?);
    let request = authority.intercept(request, "/demo.Echo/Say").await?;

    let principal = request.principal()?;
    tracing::info!(
        client = %principal.client_identifier,
        permissions = ?principal.permissions,
        "handler observes the verified caller"
    );

    // The same credential, calling a method it was never granted
    let mut request = Request::new(());
    request
        .metadata_mut()
        .insert("authorization", "Bearer demo-key".parse()?);
    match authority.intercept(request, "/demo.Echo/Shout").await {
        Ok(_) => unreachable!("the demo client is not granted /demo.Echo/Shout"),
        Err(status) => tracing::info!(
            code = ?status.code(),
            payload = %status.message(),
            "denied with a machine-parseable payload"
        ),
    }

    // No credential at all: the fixed, cause-free rejection
    match authority.intercept(Request::new(()), "/demo.Echo/Say").await {
        Ok(_) => unreachable!("anonymous calls never pass the gate"),
        Err(status) => tracing::info!(
            code = ?status.code(),
            message = %status.message(),
            "rejected without revealing why"
        ),
    }

    Ok(())
}
