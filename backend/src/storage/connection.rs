use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::storage::repositories::{AllowanceRepository, ChildRepository, LedgerRepository};
use crate::storage::traits::Connection;

/// DbConnection manages the SQLite pool and schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and make sure the
    /// schema exists
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database for a test.
    ///
    /// The pool holds exactly one connection that never expires, since an
    /// in-memory SQLite database lives only as long as its connection.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Liveness check against the pool
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                weekly_allowance_cents INTEGER NOT NULL DEFAULT 0,
                allowance_start_date TEXT NOT NULL,
                last_allowance_applied TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_children_name
            ON children(name);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                child_id INTEGER NOT NULL,
                amount_cents INTEGER NOT NULL,
                kind TEXT NOT NULL
                    CHECK (kind IN ('initial', 'purchase', 'adjustment', 'allowance')),
                note TEXT,
                timestamp TEXT NOT NULL,
                period_ending TEXT,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // History is read per child, newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_ledger_events_child_timestamp
            ON ledger_events(child_id, timestamp DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // At most one allowance credit per child and period
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_ledger_events_allowance_period
            ON ledger_events(child_id, period_ending)
            WHERE kind = 'allowance';
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type ChildRepository = ChildRepository;
    type LedgerRepository = LedgerRepository;
    type AllowanceRepository = AllowanceRepository;

    fn create_child_repository(&self) -> Self::ChildRepository {
        ChildRepository::new(self.clone())
    }

    fn create_ledger_repository(&self) -> Self::LedgerRepository {
        LedgerRepository::new(self.clone())
    }

    fn create_allowance_repository(&self) -> Self::AllowanceRepository {
        AllowanceRepository::new(self.clone())
    }
}
