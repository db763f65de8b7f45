//! In-memory storage backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Event, Speaker, MAX_DESCRIPTION_LEN};

use super::{Change, EventStore, Result, StorageError};

#[derive(Debug, Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    speakers: HashMap<Uuid, Speaker>,
}

/// Ids inserted earlier in the batch being checked.
#[derive(Default)]
struct PendingIds {
    events: HashSet<Uuid>,
    speakers: HashSet<Uuid>,
}

fn check_description(description: &str) -> Result<()> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(StorageError::ValueTooLong {
            column: "description",
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

impl Tables {
    /// Verifies that every change in the batch can be applied, in order,
    /// without touching the tables.
    fn check(&self, changes: &[Change]) -> Result<()> {
        let mut pending = PendingIds::default();

        for change in changes {
            match change {
                Change::InsertEvent(event) => {
                    check_description(&event.description)?;
                    if self.events.contains_key(&event.id) || !pending.events.insert(event.id) {
                        return Err(StorageError::AlreadyExists {
                            entity_type: "Event",
                            id: event.id,
                        });
                    }
                    for speaker in &event.speakers {
                        self.check_speaker(speaker, &mut pending)?;
                    }
                }
                Change::UpdateEvent(event) => {
                    check_description(&event.description)?;
                    self.check_event_known(event.id, &pending)?;
                }
                Change::SoftDeleteEvent(id) => self.check_event_known(*id, &pending)?,
                Change::InsertSpeaker(speaker) => self.check_speaker(speaker, &mut pending)?,
            }
        }
        Ok(())
    }

    fn check_event_known(&self, id: Uuid, pending: &PendingIds) -> Result<()> {
        if self.events.contains_key(&id) || pending.events.contains(&id) {
            return Ok(());
        }
        Err(StorageError::NotFound {
            entity_type: "Event",
            id,
        })
    }

    fn check_speaker(&self, speaker: &Speaker, pending: &mut PendingIds) -> Result<()> {
        self.check_event_known(speaker.dev_event_id, pending)?;
        if self.speakers.contains_key(&speaker.id) || !pending.speakers.insert(speaker.id) {
            return Err(StorageError::AlreadyExists {
                entity_type: "Speaker",
                id: speaker.id,
            });
        }
        Ok(())
    }

    /// Applies a change that has already passed [`Tables::check`].
    fn apply(&mut self, change: Change) {
        match change {
            Change::InsertEvent(mut event) => {
                for speaker in std::mem::take(&mut event.speakers) {
                    self.speakers.insert(speaker.id, speaker);
                }
                self.events.insert(event.id, event);
            }
            Change::UpdateEvent(event) => {
                if let Some(stored) = self.events.get_mut(&event.id) {
                    stored.update(event.title, event.description, event.start_date, event.end_date);
                }
            }
            Change::SoftDeleteEvent(id) => {
                if let Some(stored) = self.events.get_mut(&id) {
                    stored.delete();
                }
            }
            Change::InsertSpeaker(speaker) => {
                self.speakers.insert(speaker.id, speaker);
            }
        }
    }

    fn speakers_for(&self, event_id: Uuid) -> Vec<Speaker> {
        self.speakers
            .values()
            .filter(|s| s.dev_event_id == event_id)
            .cloned()
            .collect()
    }
}

/// Storage backend that keeps both tables in process memory.
///
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn list_active_events(&self) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .values()
            .filter(|e| !e.is_deleted)
            .cloned()
            .collect())
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).cloned())
    }

    async fn find_event_with_speakers(&self, id: Uuid) -> Result<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).map(|event| {
            let mut event = event.clone();
            event.speakers = tables.speakers_for(id);
            event
        }))
    }

    async fn event_exists(&self, id: Uuid) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.events.contains_key(&id))
    }

    async fn apply(&self, changes: Vec<Change>) -> Result<()> {
        let mut tables = self.tables.write().await;

        // Nothing is written unless the whole batch checks out.
        tables.check(&changes)?;
        for change in changes {
            tables.apply(change);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(title: &str) -> Event {
        Event::new(
            title.to_string(),
            "desc".to_string(),
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    fn speaker(event_id: Uuid) -> Speaker {
        Speaker {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            talk_title: "Scaling".to_string(),
            talk_description: "...".to_string(),
            linkedin_profile: "https://example.com/in/jane".to_string(),
            dev_event_id: event_id,
        }
    }

    #[tokio::test]
    async fn test_list_excludes_soft_deleted() {
        let store = InMemoryEventStore::new();
        let kept = event("kept");
        let removed = event("removed");

        store
            .apply(vec![
                Change::InsertEvent(kept.clone()),
                Change::InsertEvent(removed.clone()),
                Change::SoftDeleteEvent(removed.id),
            ])
            .await
            .unwrap();

        let listed = store.list_active_events().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, kept.id);

        let fetched = store.find_event_with_speakers(removed.id).await.unwrap();
        assert!(fetched.unwrap().is_deleted);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_speakers() {
        let store = InMemoryEventStore::new();
        let event = event("Meetup A");
        let speaker = speaker(event.id);

        store
            .apply(vec![
                Change::InsertEvent(event.clone()),
                Change::InsertSpeaker(speaker.clone()),
            ])
            .await
            .unwrap();
        store
            .apply(vec![Change::SoftDeleteEvent(event.id)])
            .await
            .unwrap();

        let fetched = store
            .find_event_with_speakers(event.id)
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.is_deleted);
        assert_eq!(fetched.speakers, vec![speaker]);
    }

    #[tokio::test]
    async fn test_update_leaves_flag_and_speakers() {
        let store = InMemoryEventStore::new();
        let original = event("Meetup A");
        let speaker = speaker(original.id);
        store
            .apply(vec![
                Change::InsertEvent(original.clone()),
                Change::InsertSpeaker(speaker),
                Change::SoftDeleteEvent(original.id),
            ])
            .await
            .unwrap();

        // A stale copy with a cleared flag and no speakers must not reset either.
        let mut edited = original.clone();
        edited.title = "Meetup B".to_string();
        store
            .apply(vec![Change::UpdateEvent(edited)])
            .await
            .unwrap();

        let fetched = store
            .find_event_with_speakers(original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "Meetup B");
        assert!(fetched.is_deleted);
        assert_eq!(fetched.speakers.len(), 1);
    }

    #[tokio::test]
    async fn test_find_event_does_not_load_speakers() {
        let store = InMemoryEventStore::new();
        let event = event("Meetup A");
        store
            .apply(vec![
                Change::InsertEvent(event.clone()),
                Change::InsertSpeaker(speaker(event.id)),
            ])
            .await
            .unwrap();

        let fetched = store.find_event(event.id).await.unwrap().unwrap();
        assert!(fetched.speakers.is_empty());
    }

    #[tokio::test]
    async fn test_insert_event_with_nested_speakers() {
        let store = InMemoryEventStore::new();
        let mut event = event("Meetup A");
        event.speakers.push(speaker(event.id));

        store
            .apply(vec![Change::InsertEvent(event.clone())])
            .await
            .unwrap();

        let fetched = store
            .find_event_with_speakers(event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.speakers, event.speakers);
    }

    #[tokio::test]
    async fn test_failed_batch_is_rolled_back() {
        let store = InMemoryEventStore::new();
        let event = event("Meetup A");

        let result = store
            .apply(vec![
                Change::InsertEvent(event.clone()),
                Change::InsertSpeaker(speaker(Uuid::new_v4())),
            ])
            .await;

        assert!(matches!(
            result,
            Err(StorageError::NotFound {
                entity_type: "Event",
                ..
            })
        ));
        assert!(!store.event_exists(event.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_description_longer_than_column_is_rejected() {
        let store = InMemoryEventStore::new();
        let mut long = event("Meetup A");
        long.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);

        let result = store.apply(vec![Change::InsertEvent(long.clone())]).await;
        assert!(matches!(
            result,
            Err(StorageError::ValueTooLong {
                column: "description",
                len: 201,
                max: 200
            })
        ));
        assert!(!store.event_exists(long.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_description_at_column_limit_is_accepted() {
        let store = InMemoryEventStore::new();
        let mut event = event("Meetup A");
        // Multi-byte characters count once each, as in VARCHAR(200)
        event.description = "é".repeat(MAX_DESCRIPTION_LEN);

        store
            .apply(vec![Change::InsertEvent(event.clone())])
            .await
            .unwrap();

        let fetched = store.find_event(event.id).await.unwrap().unwrap();
        assert_eq!(fetched.description.chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[tokio::test]
    async fn test_update_with_long_description_is_rejected() {
        let store = InMemoryEventStore::new();
        let event = event("Meetup A");
        store
            .apply(vec![Change::InsertEvent(event.clone())])
            .await
            .unwrap();

        let mut edited = event.clone();
        edited.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let result = store.apply(vec![Change::UpdateEvent(edited)]).await;

        assert!(matches!(result, Err(StorageError::ValueTooLong { .. })));
        let fetched = store.find_event(event.id).await.unwrap().unwrap();
        assert_eq!(fetched.description, "desc");
    }

    #[tokio::test]
    async fn test_batch_rejected_by_late_change_writes_nothing() {
        let store = InMemoryEventStore::new();
        let existing = event("existing");
        store
            .apply(vec![Change::InsertEvent(existing.clone())])
            .await
            .unwrap();

        let fresh = event("fresh");
        let result = store
            .apply(vec![
                Change::InsertEvent(fresh.clone()),
                Change::InsertSpeaker(speaker(fresh.id)),
                Change::SoftDeleteEvent(existing.id),
                Change::SoftDeleteEvent(Uuid::new_v4()),
            ])
            .await;

        assert!(result.is_err());
        assert!(!store.event_exists(fresh.id).await.unwrap());
        let existing = store.find_event(existing.id).await.unwrap().unwrap();
        assert!(!existing.is_deleted);
    }

    #[tokio::test]
    async fn test_changes_may_target_event_inserted_earlier_in_batch() {
        let store = InMemoryEventStore::new();
        let event = event("Meetup A");
        let mut edited = event.clone();
        edited.title = "Meetup B".to_string();

        store
            .apply(vec![
                Change::InsertEvent(event.clone()),
                Change::InsertSpeaker(speaker(event.id)),
                Change::UpdateEvent(edited),
                Change::SoftDeleteEvent(event.id),
            ])
            .await
            .unwrap();

        let fetched = store
            .find_event_with_speakers(event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "Meetup B");
        assert!(fetched.is_deleted);
        assert_eq!(fetched.speakers.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_event_is_rejected() {
        let store = InMemoryEventStore::new();
        let event = event("Meetup A");
        store
            .apply(vec![Change::InsertEvent(event.clone())])
            .await
            .unwrap();

        let result = store.apply(vec![Change::InsertEvent(event)]).await;
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_missing_event_lookups() {
        let store = InMemoryEventStore::new();
        let id = Uuid::new_v4();

        assert!(store.find_event(id).await.unwrap().is_none());
        assert!(store.find_event_with_speakers(id).await.unwrap().is_none());
        assert!(!store.event_exists(id).await.unwrap());
        assert!(store
            .apply(vec![Change::SoftDeleteEvent(id)])
            .await
            .is_err());
    }
}
