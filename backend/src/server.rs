use std::{sync::Arc, time::Duration};

use aide::openapi::OpenApi;
use axum::{http::StatusCode, middleware, Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

use crate::routes;
use crate::{
    issuance::{apply_cors, IssuanceEndpoint},
    types::Environment,
};

/// Deadline for answering any request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the application router with its extensions, request timeout and CORS headers
pub fn router(
    environment: Environment,
    issuance_endpoint: Arc<IssuanceEndpoint>,
    request_timeout: Duration,
) -> Router {
    let mut openapi = OpenApi::default();
    let cors = issuance_endpoint.cors().clone();

    routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(issuance_endpoint))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        // Outside the timeout so that timed out requests still carry CORS headers
        .layer(middleware::map_response_with_state(cors, apply_cors))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    issuance_endpoint: Arc<IssuanceEndpoint>,
) -> anyhow::Result<()> {
    let router = router(environment, issuance_endpoint, REQUEST_TIMEOUT)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default());

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Direct Upload issuance service started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
