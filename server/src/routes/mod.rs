use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config, Environment};
use crate::handlers::events::{
    add_speaker, create_event, delete_event, get_event, list_events, update_event,
};
use crate::handlers::health_check;
use crate::state::AppState;

/// Base path of the events resource; also used to build `Location` headers.
pub const EVENTS_PATH: &str = "/api/dev-events";

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let api_routes = Router::new()
        .route("/dev-events", get(list_events).post(create_event))
        .route(
            "/dev-events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/dev-events/:id/speakers", post(add_speaker));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    with_api_docs(router, config.environment)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.environment))
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

/// Exposes the OpenAPI document outside production.
#[cfg(feature = "openapi")]
fn with_api_docs(router: Router<AppState>, environment: Environment) -> Router<AppState> {
    use crate::openapi::{openapi_json, OPENAPI_PATH};

    if environment.is_production() {
        return router;
    }
    router.route(OPENAPI_PATH, get(openapi_json))
}

#[cfg(not(feature = "openapi"))]
fn with_api_docs(router: Router<AppState>, _environment: Environment) -> Router<AppState> {
    router
}
