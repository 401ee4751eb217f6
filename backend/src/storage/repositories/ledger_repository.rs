use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use crate::domain::models::ledger_event::{EventId, LedgerEvent, LedgerEventKind, NewLedgerEvent};
use crate::storage::connection::DbConnection;
use crate::storage::traits::LedgerStorage;

/// Repository for ledger event operations
#[derive(Clone)]
pub struct LedgerRepository {
    db: DbConnection,
}

impl LedgerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

/// Insert one event through any executor, so callers can run it inside their
/// own transaction
pub(crate) async fn insert_event<'e, E>(executor: E, event: &NewLedgerEvent) -> Result<EventId>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO ledger_events (child_id, amount_cents, kind, note, timestamp, period_ending)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(event.child_id)
    .bind(event.amount_cents)
    .bind(event.kind.as_str())
    .bind(&event.note)
    .bind(event.timestamp)
    .bind(event.period_ending)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Delete every event of a child through any executor. Returns the number
/// of rows removed.
pub(crate) async fn delete_events<'e, E>(executor: E, child_id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM ledger_events WHERE child_id = ?")
        .bind(child_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

fn row_to_event(row: &SqliteRow) -> Result<LedgerEvent> {
    let kind: String = row.try_get("kind")?;
    Ok(LedgerEvent {
        id: row.try_get("id")?,
        child_id: row.try_get("child_id")?,
        amount_cents: row.try_get("amount_cents")?,
        kind: kind.parse::<LedgerEventKind>()?,
        note: row.try_get("note")?,
        timestamp: row.try_get("timestamp")?,
        period_ending: row.try_get("period_ending")?,
    })
}

#[async_trait]
impl LedgerStorage for LedgerRepository {
    async fn append(&self, event: &NewLedgerEvent) -> Result<EventId> {
        insert_event(self.db.pool(), event).await
    }

    async fn balance(&self, child_id: i64) -> Result<i64> {
        let balance: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM ledger_events
            WHERE child_id = ?
            "#,
        )
        .bind(child_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(balance)
    }

    async fn history(&self, child_id: i64) -> Result<Vec<LedgerEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, child_id, amount_cents, kind, note, timestamp, period_ending
            FROM ledger_events
            WHERE child_id = ?
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(child_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_event).collect()
    }

    async fn delete_all(&self, child_id: i64) -> Result<u64> {
        delete_events(self.db.pool(), child_id).await
    }
}
