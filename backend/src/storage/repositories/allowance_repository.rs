use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::domain::models::ledger_event::NewLedgerEvent;
use crate::storage::connection::DbConnection;
use crate::storage::repositories::ledger_repository::insert_event;
use crate::storage::traits::AllowanceStorage;

/// Repository that commits accrual batches
#[derive(Clone)]
pub struct AllowanceRepository {
    db: DbConnection,
}

impl AllowanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AllowanceStorage for AllowanceRepository {
    async fn commit_accrual(
        &self,
        child_id: i64,
        expected_cursor: Option<NaiveDate>,
        new_cursor: NaiveDate,
        events: &[NewLedgerEvent],
    ) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        // Compare-and-set on the cursor; `IS` matches NULL as well
        let result = sqlx::query(
            r#"
            UPDATE children
            SET last_allowance_applied = ?
            WHERE id = ? AND last_allowance_applied IS ?
            "#,
        )
        .bind(new_cursor)
        .bind(child_id)
        .bind(expected_cursor)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            warn!(
                "Cursor for child {} is no longer {:?}, discarding {} allowance events",
                child_id,
                expected_cursor,
                events.len()
            );
            tx.rollback().await?;
            return Ok(false);
        }

        for event in events {
            insert_event(&mut *tx, event).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::child::NewChild;
    use crate::storage::repositories::{ChildRepository, LedgerRepository};
    use crate::storage::traits::{ChildStorage, LedgerStorage};
    use chrono::Utc;

    struct Fixture {
        allowances: AllowanceRepository,
        children: ChildRepository,
        ledger: LedgerRepository,
        child_id: i64,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let children = ChildRepository::new(db.clone());
        let child = children
            .store_child(
                &NewChild {
                    name: "Ada".to_string(),
                    weekly_allowance_cents: 500,
                    allowance_start_date: sunday(1),
                    created_at: Utc::now(),
                },
                None,
            )
            .await
            .expect("Failed to store child");

        Fixture {
            allowances: AllowanceRepository::new(db.clone()),
            children,
            ledger: LedgerRepository::new(db),
            child_id: child.id,
        }
    }

    /// June 2025 Sundays: 1, 8, 15, 22, 29
    fn sunday(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn credits(child_id: i64, days: &[u32]) -> Vec<NewLedgerEvent> {
        days.iter()
            .map(|d| NewLedgerEvent::allowance(child_id, 500, sunday(*d), Utc::now()))
            .collect()
    }

    #[tokio::test]
    async fn test_commit_from_unset_cursor() {
        let f = setup_test().await;

        let committed = f
            .allowances
            .commit_accrual(f.child_id, None, sunday(8), &credits(f.child_id, &[1, 8]))
            .await
            .unwrap();

        assert!(committed);
        let child = f.children.get_child(f.child_id).await.unwrap().unwrap();
        assert_eq!(child.last_allowance_applied, Some(sunday(8)));
        assert_eq!(f.ledger.balance(f.child_id).await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_stale_cursor_writes_nothing() {
        let f = setup_test().await;
        f.allowances
            .commit_accrual(f.child_id, None, sunday(1), &credits(f.child_id, &[1]))
            .await
            .unwrap();

        // A second caller that still believes the cursor is unset
        let committed = f
            .allowances
            .commit_accrual(f.child_id, None, sunday(8), &credits(f.child_id, &[8]))
            .await
            .unwrap();

        assert!(!committed);
        let child = f.children.get_child(f.child_id).await.unwrap().unwrap();
        assert_eq!(child.last_allowance_applied, Some(sunday(1)));
        assert_eq!(f.ledger.history(f.child_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_cursor() {
        let f = setup_test().await;
        let mut events = credits(f.child_id, &[1, 8]);
        // The second insert violates the foreign key
        events[1].child_id = f.child_id + 100;

        let result = f
            .allowances
            .commit_accrual(f.child_id, None, sunday(8), &events)
            .await;

        assert!(result.is_err());
        let child = f.children.get_child(f.child_id).await.unwrap().unwrap();
        assert_eq!(child.last_allowance_applied, None);
        assert!(f.ledger.history(f.child_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_period_is_rejected() {
        let f = setup_test().await;
        f.allowances
            .commit_accrual(f.child_id, None, sunday(1), &credits(f.child_id, &[1]))
            .await
            .unwrap();

        // Same period again with a matching cursor still cannot be stored twice
        let result = f
            .allowances
            .commit_accrual(f.child_id, Some(sunday(1)), sunday(1), &credits(f.child_id, &[1]))
            .await;

        assert!(result.is_err());
        assert_eq!(f.ledger.balance(f.child_id).await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_unknown_child_is_not_committed() {
        let f = setup_test().await;
        let committed = f
            .allowances
            .commit_accrual(f.child_id + 1, None, sunday(1), &[])
            .await
            .unwrap();
        assert!(!committed);
    }
}
