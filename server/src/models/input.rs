use chrono::{DateTime, Utc};
use serde::Deserialize;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request payload for creating or updating an event.
///
/// Server-owned fields (`id`, `isDeleted`) are not part of this shape; if a
/// client sends them they are ignored.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub speakers: Vec<SpeakerInput>,
}

/// Request payload for adding a speaker to an event.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SpeakerInput {
    pub name: String,
    pub talk_title: String,
    pub talk_description: String,
    pub linkedin_profile: String,
}
