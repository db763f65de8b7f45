//! PostgreSQL storage backend.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgQueryResult};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Event, Speaker};

use super::{Change, EventStore, Result, StorageError};

/// Storage backend over a `sqlx` Postgres pool.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool with at most `max_connections` connections.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Runs the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

async fn insert_event(conn: &mut PgConnection, event: &Event) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO dev_events (id, title, description, start_date, end_date, is_deleted)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(event.is_deleted)
    .execute(&mut *conn)
    .await?;

    for speaker in &event.speakers {
        insert_speaker(&mut *conn, speaker).await?;
    }
    Ok(())
}

async fn insert_speaker(conn: &mut PgConnection, speaker: &Speaker) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO dev_event_speakers
            (id, name, talk_title, talk_description, linkedin_profile, dev_event_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(speaker.id)
    .bind(&speaker.name)
    .bind(&speaker.talk_title)
    .bind(&speaker.talk_description)
    .bind(&speaker.linkedin_profile)
    .bind(speaker.dev_event_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn ensure_event_touched(result: PgQueryResult, id: Uuid) -> Result<()> {
    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity_type: "Event",
            id,
        });
    }
    Ok(())
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_active_events(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, start_date, end_date, is_deleted
            FROM dev_events
            WHERE is_deleted = FALSE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, start_date, end_date, is_deleted
            FROM dev_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    async fn find_event_with_speakers(&self, id: Uuid) -> Result<Option<Event>> {
        let Some(mut event) = self.find_event(id).await? else {
            return Ok(None);
        };

        event.speakers = sqlx::query_as::<_, Speaker>(
            r#"
            SELECT id, name, talk_title, talk_description, linkedin_profile, dev_event_id
            FROM dev_event_speakers
            WHERE dev_event_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(event))
    }

    async fn event_exists(&self, id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM dev_events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }

    async fn apply(&self, changes: Vec<Change>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for change in &changes {
            match change {
                Change::InsertEvent(event) => insert_event(&mut *tx, event).await?,
                Change::UpdateEvent(event) => {
                    let result = sqlx::query(
                        r#"
                        UPDATE dev_events
                        SET title = $2, description = $3, start_date = $4, end_date = $5
                        WHERE id = $1
                        "#,
                    )
                    .bind(event.id)
                    .bind(&event.title)
                    .bind(&event.description)
                    .bind(event.start_date)
                    .bind(event.end_date)
                    .execute(&mut *tx)
                    .await?;
                    ensure_event_touched(result, event.id)?;
                }
                Change::SoftDeleteEvent(id) => {
                    let result = sqlx::query("UPDATE dev_events SET is_deleted = TRUE WHERE id = $1")
                        .bind(*id)
                        .execute(&mut *tx)
                        .await?;
                    ensure_event_touched(result, *id)?;
                }
                Change::InsertSpeaker(speaker) => insert_speaker(&mut *tx, speaker).await?,
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
