//! MediBook HTTP server.
//!
//! Wires the identity, directory, and appointment services into an axum
//! router, with bearer-token extraction, API error mapping, and an OpenAPI
//! document for the public surface.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use server::MedibookServer;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Assemble the application router with middleware and state.
pub fn create_app(server: MedibookServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer()),
        )
        .with_state(server)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}
