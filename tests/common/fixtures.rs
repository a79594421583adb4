use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use sqlx::{Connection, SqliteConnection, sqlite::SqliteConnectOptions};
use tarot_booking::{
    BookingDb, ConsultationRepository, ConsultationRequest, NewConsultation, Notifier,
    ReminderNotice, StoreConfig, StoreError,
};

/// Path of the booking database inside a test directory.
pub fn test_db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("tarot.db")
}

/// Opens a BookingDb in a fresh temp directory without creating the table.
/// Returns both the store and the temp directory (which must be kept alive).
pub async fn open_test_db() -> (BookingDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let db = BookingDb::open(&StoreConfig::new(test_db_path(&dir)))
        .await
        .expect("Failed to open test database");
    (db, dir)
}

/// Opens a BookingDb and runs initialize() on it.
pub async fn create_test_db() -> (BookingDb, tempfile::TempDir) {
    let (db, dir) = open_test_db().await;
    db.initialize().await.expect("Failed to initialize test database");
    (db, dir)
}

/// A second, independent connection to the same file for inspecting the schema.
pub async fn raw_connection(path: &Path) -> SqliteConnection {
    SqliteConnection::connect_with(&SqliteConnectOptions::new().filename(path))
        .await
        .expect("Failed to open raw connection")
}

/// Column names of the Consultations table in declaration order.
pub async fn consultation_columns(path: &Path) -> Vec<String> {
    let mut conn = raw_connection(path).await;
    sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('Consultations') ORDER BY cid")
        .fetch_all(&mut conn)
        .await
        .expect("Failed to read table info")
}

pub async fn count_tables_named(path: &Path, table: &str) -> i64 {
    let mut conn = raw_connection(path).await;
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(table)
    .fetch_one(&mut conn)
    .await
    .expect("Failed to query sqlite_master")
}

/// Scenario A booking from the email variant of the screen.
pub fn make_anna() -> NewConsultation {
    NewConsultation::new("Anna", "anna@example.com")
        .with_consultant("")
        .with_message("Hello")
        .with_date("2024-03-01")
}

/// Scenario B booking from the phone variant: nothing optional filled in.
pub fn make_bob() -> NewConsultation {
    NewConsultation::new("Bob", "+70000000000")
}

/// Keeps every reminder it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<ReminderNotice>>,
}

impl Notifier for RecordingNotifier {
    fn schedule(&self, notice: &ReminderNotice) -> anyhow::Result<()> {
        self.notices.borrow_mut().push(notice.clone());
        Ok(())
    }
}

/// Refuses every reminder.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn schedule(&self, _notice: &ReminderNotice) -> anyhow::Result<()> {
        anyhow::bail!("notification service offline")
    }
}

pub fn unavailable() -> StoreError {
    StoreError::StorageUnavailable("disk I/O error".to_string())
}

/// A store whose medium is gone.
pub struct UnavailableStore;

impl ConsultationRepository for UnavailableStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_all(&self) -> Result<Vec<ConsultationRequest>, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _consultation: &NewConsultation) -> Result<ConsultationRequest, StoreError> {
        Err(unavailable())
    }
}

/// Wraps a real store and fails reads and/or writes on demand.
pub struct FlakyStore {
    pub inner: BookingDb,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: BookingDb) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl ConsultationRepository for FlakyStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.inner.initialize().await
    }

    async fn list_all(&self) -> Result<Vec<ConsultationRequest>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.list_all().await
    }

    async fn insert(&self, consultation: &NewConsultation) -> Result<ConsultationRequest, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.insert(consultation).await
    }
}
