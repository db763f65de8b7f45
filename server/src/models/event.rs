use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Longest description the `dev_events.description` column accepts, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Drops sub-microsecond digits, which `TIMESTAMPTZ` cannot hold.
fn storage_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// A developer conference event, the aggregate root for speakers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[sqlx(skip)]
    pub speakers: Vec<Speaker>,
    pub is_deleted: bool,
}

impl Event {
    /// Builds a fresh, non-deleted event with a generated id and no speakers.
    pub fn new(
        title: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            start_date: storage_precision(start_date),
            end_date: storage_precision(end_date),
            speakers: Vec::new(),
            is_deleted: false,
        }
    }

    /// Overwrites the editable fields. Speakers and the deletion flag are untouched.
    pub fn update(
        &mut self,
        title: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) {
        self.title = title;
        self.description = description;
        self.start_date = storage_precision(start_date);
        self.end_date = storage_precision(end_date);
    }

    pub fn delete(&mut self) {
        self.is_deleted = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub talk_title: String,
    pub talk_description: String,
    pub linkedin_profile: String,
    pub dev_event_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Event {
        Event::new(
            "Meetup A".to_string(),
            "desc".to_string(),
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_event_is_active_and_empty() {
        let event = sample();
        assert!(!event.is_deleted);
        assert!(event.speakers.is_empty());
        assert_ne!(event.id, Uuid::nil());
    }

    #[test]
    fn test_update_keeps_flag_and_speakers() {
        let mut event = sample();
        event.speakers.push(Speaker {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            talk_title: "Scaling".to_string(),
            talk_description: "...".to_string(),
            linkedin_profile: "https://example.com/jane".to_string(),
            dev_event_id: event.id,
        });
        event.delete();

        let start = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 2, 1, 18, 0, 0).unwrap();
        event.update("Meetup B".to_string(), "other".to_string(), start, end);

        assert_eq!(event.title, "Meetup B");
        assert_eq!(event.description, "other");
        assert_eq!(event.start_date, start);
        assert_eq!(event.end_date, end);
        assert!(event.is_deleted);
        assert_eq!(event.speakers.len(), 1);
    }

    #[test]
    fn test_timestamps_are_truncated_to_microseconds() {
        let start = Utc.timestamp_opt(1_735_725_600, 123_456_789).unwrap();
        let end = Utc.timestamp_opt(1_735_732_800, 999_999_999).unwrap();

        let mut event = Event::new("t".to_string(), "d".to_string(), start, end);
        assert_eq!(event.start_date.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(event.end_date.timestamp_subsec_nanos(), 999_999_000);

        event.update("t".to_string(), "d".to_string(), end, start);
        assert_eq!(event.start_date.timestamp_subsec_nanos(), 999_999_000);
        assert_eq!(event.end_date.timestamp_subsec_nanos(), 123_456_000);
    }

    #[test]
    fn test_entity_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["title"], "Meetup A");
        assert_eq!(json["isDeleted"], false);
        assert_eq!(json["startDate"], "2025-01-01T10:00:00Z");
        assert!(json["speakers"].as_array().unwrap().is_empty());
    }
}
