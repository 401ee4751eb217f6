use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use crate::domain::models::child::{Child, NewChild};
use crate::domain::models::ledger_event::{InitialBalance, LedgerEventKind, NewLedgerEvent};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::ledger_repository::{delete_events, insert_event};
use crate::storage::traits::ChildStorage;

/// Repository for child operations
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn row_to_child(row: &SqliteRow) -> Result<Child> {
    Ok(Child {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        weekly_allowance_cents: row.try_get("weekly_allowance_cents")?,
        allowance_start_date: row.try_get("allowance_start_date")?,
        last_allowance_applied: row.try_get("last_allowance_applied")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ChildStorage for ChildRepository {
    async fn store_child(&self, child: &NewChild, initial: Option<InitialBalance>) -> Result<Child> {
        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO children (name, weekly_allowance_cents, allowance_start_date, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&child.name)
        .bind(child.weekly_allowance_cents)
        .bind(child.allowance_start_date)
        .bind(child.created_at)
        .execute(&mut *tx)
        .await?;
        let child_id = result.last_insert_rowid();

        if let Some(initial) = initial {
            let event = NewLedgerEvent::new(
                child_id,
                initial.amount_cents,
                LedgerEventKind::Initial,
                Some(initial.note),
                child.created_at,
            );
            insert_event(&mut *tx, &event).await?;
        }

        tx.commit().await?;

        Ok(Child {
            id: child_id,
            name: child.name.clone(),
            weekly_allowance_cents: child.weekly_allowance_cents,
            allowance_start_date: child.allowance_start_date,
            last_allowance_applied: None,
            created_at: child.created_at,
        })
    }

    async fn get_child(&self, child_id: i64) -> Result<Option<Child>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, weekly_allowance_cents, allowance_start_date,
                   last_allowance_applied, created_at
            FROM children
            WHERE id = ?
            "#,
        )
        .bind(child_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_child).transpose()
    }

    async fn list_children(&self) -> Result<Vec<Child>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, weekly_allowance_cents, allowance_start_date,
                   last_allowance_applied, created_at
            FROM children
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_child).collect()
    }

    async fn update_weekly_allowance(&self, child_id: i64, weekly_allowance_cents: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE children
            SET weekly_allowance_cents = ?
            WHERE id = ?
            "#,
        )
        .bind(weekly_allowance_cents)
        .bind(child_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_child(&self, child_id: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        // Events go first so that nothing is left behind even without
        // foreign key enforcement
        let removed = delete_events(&mut *tx, child_id).await?;

        let result = sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(child_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        debug!("Deleted child {} with {} ledger events", child_id, removed);
        Ok(true)
    }
}
