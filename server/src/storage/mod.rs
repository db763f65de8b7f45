//! Persistence for events and speakers.
//!
//! Reads go straight to the [`EventStore`]. Writes are staged on a
//! [`UnitOfWork`] and reach the store only when it is committed, as one
//! atomic batch.

pub mod error;
pub mod memory;
pub mod postgres;
mod unit_of_work;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Event, Speaker};

pub use error::{Result, StorageError};
pub use memory::InMemoryEventStore;
pub use postgres::PgEventStore;
pub use unit_of_work::UnitOfWork;

/// A single staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Insert a new event together with any speakers it already carries.
    InsertEvent(Event),
    /// Overwrite title, description and date range of an existing event.
    UpdateEvent(Event),
    /// Set the deletion flag of an existing event.
    SoftDeleteEvent(Uuid),
    /// Insert a speaker under its `dev_event_id`.
    InsertSpeaker(Speaker),
}

/// Storage backend for the dev-events aggregate.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Returns every event whose deletion flag is false, without speakers.
    async fn list_active_events(&self) -> Result<Vec<Event>>;

    /// Gets an event by id without loading its speakers.
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// Gets an event by id with its speakers, whether or not it is soft-deleted.
    async fn find_event_with_speakers(&self, id: Uuid) -> Result<Option<Event>>;

    /// Checks whether an event row exists for `id`.
    async fn event_exists(&self, id: Uuid) -> Result<bool>;

    /// Applies a batch of changes atomically: either all of them or none.
    async fn apply(&self, changes: Vec<Change>) -> Result<()>;
}

impl dyn EventStore {
    /// Opens a new unit of work against this store.
    pub fn begin(&self) -> UnitOfWork<'_> {
        UnitOfWork::new(self)
    }
}
