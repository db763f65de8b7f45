use uuid::Uuid;

use crate::models::{Event, Speaker};

use super::{Change, EventStore, Result};

/// Pending writes against an [`EventStore`].
///
/// Nothing is persisted until [`UnitOfWork::commit`] is called. Dropping the
/// unit without committing discards every staged change.
#[must_use = "staged changes are discarded unless the unit of work is committed"]
pub struct UnitOfWork<'a> {
    store: &'a dyn EventStore,
    changes: Vec<Change>,
}

impl<'a> UnitOfWork<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self {
            store,
            changes: Vec::new(),
        }
    }

    pub fn add_event(&mut self, event: &Event) {
        self.changes.push(Change::InsertEvent(event.clone()));
    }

    pub fn update_event(&mut self, event: &Event) {
        self.changes.push(Change::UpdateEvent(event.clone()));
    }

    pub fn soft_delete_event(&mut self, id: Uuid) {
        self.changes.push(Change::SoftDeleteEvent(id));
    }

    pub fn add_speaker(&mut self, speaker: &Speaker) {
        self.changes.push(Change::InsertSpeaker(speaker.clone()));
    }

    pub fn pending(&self) -> &[Change] {
        &self.changes
    }

    /// Flushes all staged changes to the store as one atomic batch.
    pub async fn commit(self) -> Result<()> {
        if self.changes.is_empty() {
            return Ok(());
        }

        let count = self.changes.len();
        self.store.apply(self.changes).await?;
        tracing::debug!(changes = count, "Committed unit of work");
        Ok(())
    }
}
