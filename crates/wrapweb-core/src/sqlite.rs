//! SQLite-backed [`QueryStore`].
//!
//! All versions live in one table keyed by `(project, branch, revision)`.
//! Writers go through [`SqliteStore::publish`], which replaces a row inside a
//! transaction so concurrent readers never see a half-written version.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::store::{QueryStore, StoreProvider};
use crate::types::Version;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS wraps (
    project  TEXT    NOT NULL,
    branch   TEXT    NOT NULL,
    revision INTEGER NOT NULL,
    wrap     BLOB    NOT NULL,
    zip      BLOB,
    PRIMARY KEY (project, branch, revision)
)";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert or replace one version atomically.
    pub fn publish(
        &mut self,
        project: &str,
        branch: &str,
        revision: u64,
        wrap: &[u8],
        zip: Option<&[u8]>,
    ) -> Result<()> {
        let revision = sql_revision(revision).ok_or_else(|| {
            crate::WrapError::Config(format!("revision {revision} is out of range"))
        })?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO wraps (project, branch, revision, wrap, zip)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (project, branch, revision)
             DO UPDATE SET wrap = excluded.wrap, zip = excluded.zip",
            params![project, branch, revision, wrap, zip],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn artifact_column(
        &self,
        column: &str,
        project: &str,
        branch: &str,
        revision: u64,
    ) -> Result<Option<Vec<u8>>> {
        let Some(revision) = sql_revision(revision) else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT {column} FROM wraps WHERE project = ?1 AND branch = ?2 AND revision = ?3"
        );
        let value: Option<Option<Vec<u8>>> = self
            .conn
            .query_row(&sql, params![project, branch, revision], |row| row.get(0))
            .optional()?;
        Ok(value.flatten())
    }
}

fn sql_revision(revision: u64) -> Option<i64> {
    i64::try_from(revision).ok()
}

impl QueryStore for SqliteStore {
    fn search_names(&self, substring: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT project FROM wraps
             WHERE ?1 = '' OR instr(project, ?1) > 0
             ORDER BY project",
        )?;
        let names = stmt
            .query_map(params![substring], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn list_versions(&self, project: &str) -> Result<Vec<Version>> {
        let mut stmt = self.conn.prepare(
            "SELECT branch, revision FROM wraps WHERE project = ?1 ORDER BY branch, revision",
        )?;
        let rows = stmt
            .query_map(params![project], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows
            .into_iter()
            .filter_map(|(branch, revision)| {
                u64::try_from(revision)
                    .ok()
                    .map(|revision| Version { branch, revision })
            })
            .collect())
    }

    fn get_wrap(&self, project: &str, branch: &str, revision: u64) -> Result<Option<Vec<u8>>> {
        self.artifact_column("wrap", project, branch, revision)
    }

    fn get_zip(&self, project: &str, branch: &str, revision: u64) -> Result<Option<Vec<u8>>> {
        self.artifact_column("zip", project, branch, revision)
    }
}

/// Opens a fresh connection to the database file for every request.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    path: PathBuf,
}

impl SqliteProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreProvider for SqliteProvider {
    fn open(&self) -> Result<Box<dyn QueryStore>> {
        Ok(Box::new(SqliteStore::open(&self.path)?))
    }
}
