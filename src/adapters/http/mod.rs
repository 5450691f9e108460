//! HTTP adapters - REST API implementations.
//!
//! Each component has its own HTTP adapter; [`app_router`] composes them
//! with the shared middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Request ID (`x-request-id`, generated when absent)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID propagation to the response
//! 4. CORS
//! 5. Per-route timeout (checkout and webhook budgets differ)

pub mod checkout;
pub mod webhooks;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use checkout::{checkout_router, CheckoutAppState};
pub use webhooks::{webhook_router, WebhookAppState};

/// Build the complete application router.
///
/// # Routes
/// - `GET /health` - Liveness
/// - `POST|OPTIONS /checkout`
/// - `POST|OPTIONS /webhooks/stripe`
pub fn app_router(
    checkout: CheckoutAppState,
    webhooks: WebhookAppState,
    server: &ServerConfig,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(
            checkout_router()
                .with_state(checkout)
                .layer(TimeoutLayer::new(server.checkout_timeout())),
        )
        .merge(
            webhook_router()
                .with_state(webhooks)
                .layer(TimeoutLayer::new(server.webhook_timeout())),
        )
        .layer(cors_layer(&server.storefront_origins()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// CORS for browser storefronts. Any origin when none are configured.
fn cors_layer(origins: &[&str]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("stripe-signature"),
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}
