mod docs;
mod health;
pub mod signed_urls;

use aide::axum::{
    routing::{get, post_with},
    ApiRouter,
};
use axum::routing::MethodRouter;

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route(
            "/get-signed-urls",
            post_with(signed_urls::handler, signed_urls::docs),
        )
        // Every other method reaches the endpoint too, so preflights and rejections carry CORS headers
        .route(
            "/get-signed-urls",
            MethodRouter::new().fallback(signed_urls::handler),
        )
}
