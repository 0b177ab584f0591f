//! PODIUM puzzle table backed by SQLite.
//!
//! One row per calendar date. `puzzle_date` is UNIQUE and replacement runs
//! delete-then-insert inside a single transaction, so two overlapping cron
//! runs can never leave two rows (or zero rows) for a date.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::RankingPuzzle;
use crate::error::{PuzzleError, Result};

/// Storage operations the PODIUM generator and checker need
pub trait PodiumStore: Send + Sync {
    /// Whether a puzzle exists for `date`
    fn exists(&self, date: NaiveDate) -> Result<bool>;

    /// Highest puzzle number stored, if any
    fn max_puzzle_number(&self) -> Result<Option<i64>>;

    /// Categories of the most recent puzzles, newest first
    fn recent_categories(&self, limit: usize) -> Result<Vec<String>>;

    /// Insert a new puzzle; fails if the date is taken
    fn insert(&self, date: NaiveDate, puzzle_number: i64, puzzle: &RankingPuzzle) -> Result<()>;

    /// Delete whatever is stored for `date`, returning the rows removed
    fn delete(&self, date: NaiveDate) -> Result<usize>;

    /// Delete any existing row for `date` and insert, atomically
    fn replace(&self, date: NaiveDate, puzzle_number: i64, puzzle: &RankingPuzzle) -> Result<()>;

    /// Raw stored columns for `date`, untouched
    fn select(&self, date: NaiveDate) -> Result<Option<PodiumRow>>;

    /// Next puzzle number (max + 1, or 1 for an empty table)
    fn next_puzzle_number(&self) -> Result<i64> {
        Ok(self.max_puzzle_number()?.unwrap_or(0) + 1)
    }
}

/// Stored columns exactly as read; any of them may be NULL or malformed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodiumRow {
    pub puzzle_number: i64,
    pub question: Option<String>,
    pub direction: Option<String>,
    pub category: Option<String>,
    pub emoji: Option<String>,
    pub fun_fact: Option<String>,
    pub items_json: Option<String>,
}

/// SQLite implementation of [`PodiumStore`].
///
/// `rusqlite::Connection` isn't Sync, so it sits behind a Mutex.
pub struct SqliteStore {
    inner: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            inner: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS podium_puzzle (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                puzzle_date TEXT NOT NULL UNIQUE,
                puzzle_number INTEGER NOT NULL,
                question TEXT,
                direction TEXT,
                category TEXT,
                emoji TEXT,
                fun_fact TEXT,
                items_json TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_podium_puzzle_number ON podium_puzzle(puzzle_number);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.inner.lock().map_err(|e| PuzzleError::Storage(e.to_string()))
    }

    fn insert_row(conn: &Connection, date: NaiveDate, puzzle_number: i64, puzzle: &RankingPuzzle) -> Result<()> {
        let items_json = serde_json::to_string(&puzzle.items)?;
        conn.execute(
            r#"
            INSERT INTO podium_puzzle
                (puzzle_date, puzzle_number, question, direction, category, emoji, fun_fact, items_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                date.to_string(),
                puzzle_number,
                puzzle.question,
                puzzle.direction,
                puzzle.category,
                puzzle.emoji,
                puzzle.fun_fact,
                items_json,
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation => {
                PuzzleError::Storage(format!("A puzzle already exists for {}", date))
            }
            other => other.into(),
        })?;
        Ok(())
    }

    /// Write arbitrary column values, bypassing validation.
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, date: NaiveDate, row: &PodiumRow) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO podium_puzzle
                (puzzle_date, puzzle_number, question, direction, category, emoji, fun_fact, items_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                date.to_string(),
                row.puzzle_number,
                row.question,
                row.direction,
                row.category,
                row.emoji,
                row.fun_fact,
                row.items_json,
            ],
        )?;
        Ok(())
    }
}

impl PodiumStore for SqliteStore {
    fn exists(&self, date: NaiveDate) -> Result<bool> {
        let found = self
            .conn()?
            .query_row(
                "SELECT 1 FROM podium_puzzle WHERE puzzle_date = ?1",
                [date.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn max_puzzle_number(&self) -> Result<Option<i64>> {
        let max = self
            .conn()?
            .query_row("SELECT MAX(puzzle_number) FROM podium_puzzle", [], |row| row.get(0))?;
        Ok(max)
    }

    fn recent_categories(&self, limit: usize) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category FROM podium_puzzle WHERE category IS NOT NULL AND category != '' \
             ORDER BY puzzle_date DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| row.get::<_, String>(0))?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    fn insert(&self, date: NaiveDate, puzzle_number: i64, puzzle: &RankingPuzzle) -> Result<()> {
        let conn = self.conn()?;
        Self::insert_row(&conn, date, puzzle_number, puzzle)
    }

    fn delete(&self, date: NaiveDate) -> Result<usize> {
        let removed = self
            .conn()?
            .execute("DELETE FROM podium_puzzle WHERE puzzle_date = ?1", [date.to_string()])?;
        Ok(removed)
    }

    fn replace(&self, date: NaiveDate, puzzle_number: i64, puzzle: &RankingPuzzle) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM podium_puzzle WHERE puzzle_date = ?1", [date.to_string()])?;
        Self::insert_row(&tx, date, puzzle_number, puzzle)?;
        tx.commit()?;
        Ok(())
    }

    fn select(&self, date: NaiveDate) -> Result<Option<PodiumRow>> {
        let row = self
            .conn()?
            .query_row(
                "SELECT puzzle_number, question, direction, category, emoji, fun_fact, items_json \
                 FROM podium_puzzle WHERE puzzle_date = ?1",
                [date.to_string()],
                |row| {
                    Ok(PodiumRow {
                        puzzle_number: row.get(0)?,
                        question: row.get(1)?,
                        direction: row.get(2)?,
                        category: row.get(3)?,
                        emoji: row.get(4)?,
                        fun_fact: row.get(5)?,
                        items_json: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
