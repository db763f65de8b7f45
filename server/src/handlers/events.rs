//! Handlers for `/api/dev-events`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::handlers::extract::{EventId, JsonBody};
use crate::mapping::to_views;
#[cfg(feature = "openapi")]
use crate::models::Event;
use crate::models::{EventInput, EventView, SpeakerInput};
use crate::routes::EVENTS_PATH;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::created;

fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{id}' was not found"))
}

/// List all events that are not soft-deleted (GET /api/dev-events).
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/dev-events",
    tag = "dev-events",
    responses((status = 200, description = "Events that are not soft-deleted", body = [EventView]))
))]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventView>>, AppError> {
    let events = state.store.list_active_events().await?;
    Ok(Json(to_views(events)))
}

/// Get one event with its speakers (GET /api/dev-events/:id).
///
/// Soft-deleted events are still returned.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/dev-events/{id}",
    tag = "dev-events",
    params(("id" = Uuid, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event with its speakers", body = EventView),
        (status = 404, description = "Event not found")
    )
))]
pub async fn get_event(
    State(state): State<AppState>,
    EventId(id): EventId,
) -> Result<Json<EventView>, AppError> {
    let event = state
        .store
        .find_event_with_speakers(id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    Ok(Json(event.into()))
}

/// Create an event (POST /api/dev-events).
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/dev-events",
    tag = "dev-events",
    request_body = EventInput,
    responses(
        (status = 201, description = "Created event", body = Event,
            headers(("location" = String, description = "URL of the new event")))
    )
))]
pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<EventInput>,
) -> Result<Response, AppError> {
    let event = input.into_event();

    let mut uow = state.store.begin();
    uow.add_event(&event);
    uow.commit().await?;

    info!(event_id = %event.id, title = %event.title, "Created dev event");

    let location = format!("{EVENTS_PATH}/{}", event.id);
    Ok(created(&location, event))
}

/// Overwrite title, description and date range (PUT /api/dev-events/:id).
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/dev-events/{id}",
    tag = "dev-events",
    params(("id" = Uuid, Path, description = "Event identifier")),
    request_body = EventInput,
    responses(
        (status = 204, description = "Event updated"),
        (status = 404, description = "Event not found")
    )
))]
pub async fn update_event(
    State(state): State<AppState>,
    EventId(id): EventId,
    JsonBody(input): JsonBody<EventInput>,
) -> Result<StatusCode, AppError> {
    let mut event = state
        .store
        .find_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    input.apply_to(&mut event);

    let mut uow = state.store.begin();
    uow.update_event(&event);
    uow.commit().await?;

    info!(event_id = %id, "Updated dev event");

    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete an event (DELETE /api/dev-events/:id).
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/dev-events/{id}",
    tag = "dev-events",
    params(("id" = Uuid, Path, description = "Event identifier")),
    responses(
        (status = 204, description = "Event soft-deleted"),
        (status = 404, description = "Event not found")
    )
))]
pub async fn delete_event(
    State(state): State<AppState>,
    EventId(id): EventId,
) -> Result<StatusCode, AppError> {
    let mut event = state
        .store
        .find_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    event.delete();

    let mut uow = state.store.begin();
    uow.soft_delete_event(event.id);
    uow.commit().await?;

    info!(event_id = %id, "Soft-deleted dev event");

    Ok(StatusCode::NO_CONTENT)
}

/// Attach a speaker to an event (POST /api/dev-events/:id/speakers).
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/dev-events/{id}/speakers",
    tag = "dev-events",
    params(("id" = Uuid, Path, description = "Event identifier")),
    request_body = SpeakerInput,
    responses(
        (status = 204, description = "Speaker added"),
        (status = 404, description = "Event not found")
    )
))]
pub async fn add_speaker(
    State(state): State<AppState>,
    EventId(id): EventId,
    JsonBody(input): JsonBody<SpeakerInput>,
) -> Result<StatusCode, AppError> {
    let speaker = input.into_speaker(id);

    if !state.store.event_exists(id).await? {
        return Err(event_not_found(id));
    }

    let mut uow = state.store.begin();
    uow.add_speaker(&speaker);
    uow.commit().await?;

    info!(event_id = %id, speaker_id = %speaker.id, "Added speaker to dev event");

    Ok(StatusCode::NO_CONTENT)
}
