// crates/project-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Ledger Store
// Description: Durable sequence allocator and mapping store backed by SQLite.
// Purpose: Issue project numbers atomically across processes.
// Dependencies: project-ledger-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`SequenceAllocator`] and [`MappingStore`] on top of
//! `SQLite`. Counter increments run as a single `INSERT .. ON CONFLICT DO
//! UPDATE .. RETURNING` statement and every write runs in an `IMMEDIATE`
//! transaction, so concurrent writers serialize on the database lock rather
//! than on any in-process state. Uniqueness of project numbers and source
//! records is enforced by table constraints and surfaced as
//! [`StoreError::Duplicate`] with the violated key.
//!
//! Reads verify that each stored row still agrees with its project number and
//! fail closed with [`SqliteStoreError::Corrupt`] otherwise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use project_ledger_core::DuplicateKey;
use project_ledger_core::MappingStore;
use project_ledger_core::NewProjectMapping;
use project_ledger_core::ProjectMapping;
use project_ledger_core::ProjectNumber;
use project_ledger_core::SequenceAllocator;
use project_ledger_core::SourceRecordId;
use project_ledger_core::StoreError;
use project_ledger_core::is_department_code;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Largest two-digit year accepted for a partition.
const MAX_YEAR: u8 = 99;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Returns a config for `path` with default timeouts and modes.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// A uniqueness constraint rejected the write.
    #[error("sqlite store duplicate key: {0}")]
    Duplicate(DuplicateKey),
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored rows violate mapping invariants.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Duplicate(key) => Self::Duplicate(key),
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed ledger store with WAL support.
///
/// Clones share one connection. Separate instances opened on the same file
/// coordinate through `SQLite` locking.
#[derive(Clone)]
pub struct SqliteLedgerStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteLedgerStore {
    /// Opens an `SQLite`-backed ledger store, creating the schema on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or carries an unsupported schema version.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the number of stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the count query fails.
    pub fn mapping_count(&self) -> Result<u64, SqliteStoreError> {
        let guard = self.lock()?;
        let count: i64 = guard
            .query_row("SELECT COUNT(*) FROM project_mappings", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        u64::try_from(count)
            .map_err(|_| SqliteStoreError::Corrupt(format!("negative mapping count {count}")))
    }

    /// Acquires the connection lock.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }
}

impl SequenceAllocator for SqliteLedgerStore {
    fn next_sequence(&self, department_code: &str, year: u8) -> Result<u64, StoreError> {
        self.increment_counter(department_code, year).map_err(StoreError::from)
    }

    fn current_sequence(
        &self,
        department_code: &str,
        year: u8,
    ) -> Result<Option<u64>, StoreError> {
        self.read_counter(department_code, year).map_err(StoreError::from)
    }
}

impl MappingStore for SqliteLedgerStore {
    fn find_by_source_id(&self, id: SourceRecordId) -> Result<Option<ProjectMapping>, StoreError> {
        self.load_by_source_id(id).map_err(StoreError::from)
    }

    fn find_by_project_number(
        &self,
        project_number: &ProjectNumber,
    ) -> Result<Option<ProjectMapping>, StoreError> {
        self.load_by_project_number(project_number).map_err(StoreError::from)
    }

    fn create_mapping(&self, mapping: &NewProjectMapping) -> Result<(), StoreError> {
        self.insert_mapping(mapping).map_err(StoreError::from)
    }

    fn link_source_id(
        &self,
        project_number: &ProjectNumber,
        id: SourceRecordId,
    ) -> Result<Option<ProjectMapping>, StoreError> {
        self.insert_member(project_number, id).map_err(StoreError::from)
    }
}

impl SqliteLedgerStore {
    /// Atomically increments the partition counter and returns the new value.
    fn increment_counter(&self, department_code: &str, year: u8) -> Result<u64, SqliteStoreError> {
        validate_partition(department_code, year)?;
        let updated_at = unix_millis();
        let mut guard = self.lock()?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let value: i64 = tx
            .query_row(
                "INSERT INTO sequence_counters (department_code, year, last_sequence, updated_at) \
                 VALUES (?1, ?2, 1, ?3) ON CONFLICT(department_code, year) DO UPDATE SET \
                 last_sequence = last_sequence + 1, updated_at = excluded.updated_at RETURNING \
                 last_sequence",
                params![department_code, i64::from(year), updated_at],
                |row| row.get(0),
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        u64::try_from(value).map_err(|_| {
            SqliteStoreError::Corrupt(format!(
                "negative counter for partition {department_code}{year:02}"
            ))
        })
    }

    /// Reads the partition counter without incrementing it.
    fn read_counter(
        &self,
        department_code: &str,
        year: u8,
    ) -> Result<Option<u64>, SqliteStoreError> {
        let guard = self.lock()?;
        let value: Option<i64> = guard
            .query_row(
                "SELECT last_sequence FROM sequence_counters WHERE department_code = ?1 AND year \
                 = ?2",
                params![department_code, i64::from(year)],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        value
            .map(|value| {
                u64::try_from(value).map_err(|_| {
                    SqliteStoreError::Corrupt(format!(
                        "negative counter for partition {department_code}{year:02}"
                    ))
                })
            })
            .transpose()
    }

    /// Loads the mapping whose member set contains `id`.
    fn load_by_source_id(
        &self,
        id: SourceRecordId,
    ) -> Result<Option<ProjectMapping>, SqliteStoreError> {
        let raw_id = encode_source_id(id)?;
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let owner: Option<String> = tx
            .query_row(
                "SELECT project_number FROM mapping_members WHERE source_record_id = ?1",
                params![raw_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mapping = match owner {
            None => None,
            Some(owner) => Some(load_mapping(&tx, &owner)?.ok_or_else(|| {
                SqliteStoreError::Corrupt(format!(
                    "source record {id} points at missing mapping {owner}"
                ))
            })?),
        };
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(mapping)
    }

    /// Loads the mapping keyed by `project_number`.
    fn load_by_project_number(
        &self,
        project_number: &ProjectNumber,
    ) -> Result<Option<ProjectMapping>, SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mapping = load_mapping(&tx, project_number.as_str())?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(mapping)
    }

    /// Inserts a new mapping and its first member in one transaction.
    fn insert_mapping(&self, mapping: &NewProjectMapping) -> Result<(), SqliteStoreError> {
        let raw_id = encode_source_id(mapping.source_record_id())?;
        let created_at = unix_millis();
        let mut guard = self.lock()?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        match tx.execute(
            "INSERT INTO project_mappings (project_number, department_code, year, sequence, \
             department, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                mapping.project_number().as_str(),
                mapping.department_code(),
                i64::from(mapping.year()),
                i64::from(mapping.sequence()),
                mapping.department(),
                created_at
            ],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(SqliteStoreError::Duplicate(DuplicateKey::ProjectNumber(
                    mapping.project_number().clone(),
                )));
            }
            Err(err) => return Err(SqliteStoreError::Db(err.to_string())),
        }
        match tx.execute(
            "INSERT INTO mapping_members (source_record_id, project_number, linked_at) VALUES \
             (?1, ?2, ?3)",
            params![raw_id, mapping.project_number().as_str(), created_at],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(SqliteStoreError::Duplicate(DuplicateKey::SourceRecordId(
                    mapping.source_record_id(),
                )));
            }
            Err(err) => return Err(SqliteStoreError::Db(err.to_string())),
        }
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Adds `id` to the member set of `project_number`.
    fn insert_member(
        &self,
        project_number: &ProjectNumber,
        id: SourceRecordId,
    ) -> Result<Option<ProjectMapping>, SqliteStoreError> {
        let raw_id = encode_source_id(id)?;
        let linked_at = unix_millis();
        let mut guard = self.lock()?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let exists = tx
            .query_row(
                "SELECT 1 FROM project_mappings WHERE project_number = ?1",
                params![project_number.as_str()],
                |_| Ok(()),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?
            .is_some();
        if !exists {
            return Ok(None);
        }
        let owner: Option<String> = tx
            .query_row(
                "SELECT project_number FROM mapping_members WHERE source_record_id = ?1",
                params![raw_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        match owner {
            Some(owner) if owner != project_number.as_str() => {
                return Err(SqliteStoreError::Duplicate(DuplicateKey::SourceRecordId(id)));
            }
            Some(_) => {}
            None => {
                tx.execute(
                    "INSERT INTO mapping_members (source_record_id, project_number, linked_at) \
                     VALUES (?1, ?2, ?3)",
                    params![raw_id, project_number.as_str(), linked_at],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            }
        }
        tx.execute(
            "UPDATE project_mappings SET updated_at = ?2 WHERE project_number = ?1",
            params![project_number.as_str(), linked_at],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mapping = load_mapping(&tx, project_number.as_str())?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(mapping)
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Loads and validates one mapping with its member set.
fn load_mapping(
    connection: &Connection,
    project_number: &str,
) -> Result<Option<ProjectMapping>, SqliteStoreError> {
    let row = connection
        .query_row(
            "SELECT department_code, year, sequence, department, created_at, updated_at FROM \
             project_mappings WHERE project_number = ?1",
            params![project_number],
            |row| {
                let department_code: String = row.get(0)?;
                let year: i64 = row.get(1)?;
                let sequence: i64 = row.get(2)?;
                let department: String = row.get(3)?;
                let created_at: i64 = row.get(4)?;
                let updated_at: i64 = row.get(5)?;
                Ok((department_code, year, sequence, department, created_at, updated_at))
            },
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some((department_code, year, sequence, department, created_at_ms, updated_at_ms)) = row
    else {
        return Ok(None);
    };
    let number = ProjectNumber::new(project_number)
        .map_err(|err| SqliteStoreError::Corrupt(err.to_string()))?;
    let year = u8::try_from(year).map_err(|_| {
        SqliteStoreError::Corrupt(format!("year {year} out of range for {project_number}"))
    })?;
    let sequence = u16::try_from(sequence).map_err(|_| {
        SqliteStoreError::Corrupt(format!("sequence {sequence} out of range for {project_number}"))
    })?;
    let parts = number.parts();
    if parts.department_code != department_code || parts.year != year || parts.sequence != sequence
    {
        return Err(SqliteStoreError::Corrupt(format!(
            "mapping {project_number} disagrees with stored components {department_code}/{year}/\
             {sequence}"
        )));
    }
    let source_record_ids = load_members(connection, project_number)?;
    if source_record_ids.is_empty() {
        return Err(SqliteStoreError::Corrupt(format!(
            "mapping {project_number} has no source records"
        )));
    }
    Ok(Some(ProjectMapping {
        project_number: number,
        department_code,
        year,
        sequence,
        department,
        source_record_ids,
        created_at_ms,
        updated_at_ms,
    }))
}

/// Loads the member set of one mapping.
fn load_members(
    connection: &Connection,
    project_number: &str,
) -> Result<BTreeSet<SourceRecordId>, SqliteStoreError> {
    let mut statement = connection
        .prepare(
            "SELECT source_record_id FROM mapping_members WHERE project_number = ?1 ORDER BY \
             source_record_id",
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let rows = statement
        .query_map(params![project_number], |row| row.get::<_, i64>(0))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let mut members = BTreeSet::new();
    for row in rows {
        let raw = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let id = SourceRecordId::try_from(raw).map_err(|_| {
            SqliteStoreError::Corrupt(format!("invalid source record id {raw} in {project_number}"))
        })?;
        members.insert(id);
    }
    Ok(members)
}

/// Converts a source record id to its `SQLite` integer form.
fn encode_source_id(id: SourceRecordId) -> Result<i64, SqliteStoreError> {
    i64::try_from(id.get()).map_err(|_| {
        SqliteStoreError::Invalid(format!("source record id {id} exceeds sqlite integer range"))
    })
}

/// Rejects partitions that cannot form a project number.
fn validate_partition(department_code: &str, year: u8) -> Result<(), SqliteStoreError> {
    if !is_department_code(department_code) {
        return Err(SqliteStoreError::Invalid(format!(
            "department code {department_code:?} must be two uppercase letters"
        )));
    }
    if year > MAX_YEAR {
        return Err(SqliteStoreError::Invalid(format!("year {year} exceeds two digits")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must be non-empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durable defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability and shared access.
///
/// The busy timeout is set first so the journal mode switch waits on other
/// connections instead of failing.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS sequence_counters (
                    department_code TEXT NOT NULL,
                    year INTEGER NOT NULL,
                    last_sequence INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (department_code, year)
                );
                CREATE TABLE IF NOT EXISTS project_mappings (
                    project_number TEXT PRIMARY KEY,
                    department_code TEXT NOT NULL,
                    year INTEGER NOT NULL,
                    sequence INTEGER NOT NULL,
                    department TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    UNIQUE (department_code, year, sequence)
                );
                CREATE TABLE IF NOT EXISTS mapping_members (
                    source_record_id INTEGER PRIMARY KEY,
                    project_number TEXT NOT NULL,
                    linked_at INTEGER NOT NULL,
                    FOREIGN KEY (project_number) REFERENCES project_mappings(project_number)
                );
                CREATE INDEX IF NOT EXISTS idx_mapping_members_project_number
                    ON mapping_members (project_number);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
