use std::{future::Future, path::PathBuf, time::Duration};

use sqlx::{
    Connection, Sqlite,
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::core::error::StoreError;

pub(super) struct StoreState {
    db_path: PathBuf,
    timeout: Duration,
    pool: SqlitePool,
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("db_path", &self.db_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StoreState {
    pub(super) async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let connect_opts = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true)
            // rollback journal: nothing but the database file stays on disk
            .journal_mode(SqliteJournalMode::Delete);

        // connect_with establishes the first connection, so a missing
        // directory or unreadable file surfaces here rather than on first use.
        let pool = bounded(config.timeout, "open database", async move {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.timeout)
                .connect_with(connect_opts)
                .await
                .map_err(StoreError::from)
        })
        .await?;

        info!(path = %config.db_path.display(), "opened booking database");
        Ok(Self {
            db_path: config.db_path.clone(),
            timeout: config.timeout,
            pool,
        })
    }

    pub(super) async fn conn(&self) -> Result<PoolConnection<Sqlite>, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    /// Apply the embedded schema, then bring a `Consultations` table created by
    /// an older app build up to the current columns.
    pub(super) async fn migrate(&self) -> Result<(), StoreError> {
        self.bounded("initialize schema", apply_schema(&self.pool)).await
    }

    /// Run one store operation under the configured timeout.
    pub(super) async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        bounded(self.timeout, operation, fut).await
    }
}

const CONSULTATION_COLUMNS: [&str; 6] = ["id", "name", "contact", "consultant", "message", "date"];

/// Columns older builds kept the contact in, in preference order.
const LEGACY_CONTACT_COLUMNS: [&str; 2] = ["email", "phone"];

async fn apply_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    // Every statement is `IF NOT EXISTS` and the migrator skips versions it
    // has already recorded.
    sqlx::migrate!("./migrations").run(pool).await?;

    let mut conn = pool.acquire().await?;
    let mut tx = conn.begin().await?;
    let existing: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info('Consultations')")
            .fetch_all(&mut *tx)
            .await?;
    let has_column = |column: &str| existing.iter().any(|e| e.eq_ignore_ascii_case(column));

    let missing: Vec<&str> = CONSULTATION_COLUMNS
        .into_iter()
        .filter(|column| !has_column(*column))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    if missing.contains(&"id") {
        return Err(StoreError::StorageUnavailable(
            "table Consultations has no id column".to_string(),
        ));
    }

    for column in &missing {
        let sql = format!("ALTER TABLE Consultations ADD COLUMN {column} TEXT");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }

    if missing.contains(&"contact") {
        let legacy: Vec<&str> = LEGACY_CONTACT_COLUMNS
            .into_iter()
            .filter(|column| has_column(*column))
            .collect();
        let source = match legacy.as_slice() {
            [] => None,
            [only] => Some(only.to_string()),
            many => Some(format!("COALESCE({})", many.join(", "))),
        };
        if let Some(source) = source {
            let sql = format!("UPDATE Consultations SET contact = {source}");
            sqlx::query(&sql).execute(&mut *tx).await?;
        }
    }

    tx.commit().await?;
    warn!(columns = ?missing, "added missing columns to existing Consultations table");
    Ok(())
}

async fn bounded<T, F>(timeout: Duration, operation: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let result = match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::timed_out(operation, timeout)),
    };
    if let Err(err) = &result {
        debug!(operation, error = %err, "storage operation failed");
    }
    result
}
