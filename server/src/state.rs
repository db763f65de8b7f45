use std::sync::Arc;

use crate::storage::{EventStore, InMemoryEventStore};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// State backed by a fresh, empty [`InMemoryEventStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEventStore::new()))
    }
}
