//! OpenAPI document for the dev-events API, generated from handler annotations.

use axum::Json;
use utoipa::OpenApi;

use crate::handlers::events;
use crate::models::{Event, EventInput, EventView, Speaker, SpeakerInput, SpeakerView};

/// Where the generated document is served in development.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "dev-events API",
        description = "Developer conference events and their speakers",
        contact(name = "dev-events maintainers")
    ),
    paths(
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::add_speaker,
    ),
    components(schemas(Event, Speaker, EventInput, SpeakerInput, EventView, SpeakerView)),
    tags((name = "dev-events", description = "Event and speaker management"))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document (GET /api-docs/openapi.json).
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
