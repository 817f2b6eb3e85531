use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use backend::{
    issuance::{CorsPolicy, IssuanceEndpoint},
    media_storage::{key::mock::SequentialIdSource, mock::MockUrlIssuer, KeyDeriver, UrlIssuer},
    server::{self, REQUEST_TIMEOUT},
    types::Environment,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

pub const TEST_ORIGIN: &str = "https://uploads.example.com";
pub const SIGNED_URLS_ROUTE: &str = "/get-signed-urls";

/// Setup test environment with tracing output
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired like production, with a deterministic key deriver
pub struct TestSetup {
    pub router: Router,
}

impl TestSetup {
    /// Setup backed by a mock issuer
    pub fn new(url_issuer: Arc<MockUrlIssuer>) -> Self {
        Self::with_url_issuer(url_issuer)
    }

    pub fn with_url_issuer(url_issuer: Arc<dyn UrlIssuer>) -> Self {
        Self::with_request_timeout(url_issuer, REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(url_issuer: Arc<dyn UrlIssuer>, request_timeout: Duration) -> Self {
        setup_test_env();

        let environment = Environment::Development {
            presign_expiry_override: None,
        };

        let issuance_endpoint = Arc::new(IssuanceEndpoint::new(
            KeyDeriver::new(Arc::new(SequentialIdSource::default())),
            url_issuer,
            CorsPolicy::new(TEST_ORIGIN).expect("valid test origin"),
        ));

        let router = server::router(environment, issuance_endpoint, request_timeout);

        Self { router }
    }

    pub async fn send_request(
        &self,
        method: Method,
        route: &str,
        headers: &[(&str, &str)],
        body: impl Into<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method(method);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body.into())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        body: impl Into<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request(
            Method::POST,
            route,
            &[("Content-Type", "application/json")],
            body,
        )
        .await
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request(Method::GET, route, &[], Body::empty())
            .await
    }
}
