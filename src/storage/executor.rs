//! Executes generated SQL against the local SQLite file.
//!
//! The statement text is run exactly as received. With the default
//! `StatementGuard::Unchecked` nothing restricts it to reads: a model that
//! answers with `DELETE FROM STUDENT` empties the table. Enable
//! `StatementGuard::ReadOnly` to refuse anything but a single SELECT.

use crate::storage::guard::StatementGuard;
use crate::telemetry::{db_query_span, record_returned_rows};
use crate::types::{Error, ResultSet, Result, Row, Value};
use rusqlite::{Batch, Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Runs one statement per call on a fresh connection.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    path: PathBuf,
    guard: StatementGuard,
}

impl QueryExecutor {
    /// Create executor for the database file at `path`.
    ///
    /// The file is not touched until the first `execute`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: StatementGuard::default(),
        }
    }

    pub fn with_guard(mut self, guard: StatementGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn guard(&self) -> StatementGuard {
        self.guard
    }

    /// Open a connection without creating the file.
    ///
    /// The schema is never created here: a missing file is an error rather
    /// than a fresh empty database.
    fn open(&self) -> Result<Connection> {
        let access = if self.guard.is_read_only() {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        let flags = access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        Ok(Connection::open_with_flags(&self.path, flags)?)
    }

    /// Execute `sql` as a single statement and collect every row.
    ///
    /// # Arguments
    ///
    /// * `sql` - Statement text, executed verbatim
    ///
    /// # Returns
    ///
    /// Column names and all rows, in engine order
    ///
    /// # Errors
    ///
    /// - `Error::EmptyQuery` for text holding no statement (empty, whitespace,
    ///   a bare `;` or only comments)
    /// - `Error::MultipleStatements` if anything but whitespace or comments
    ///   follows the first statement; nothing is executed in that case
    /// - `Error::Rejected` if the guard refuses the statement
    /// - `Error::Sql` for anything SQLite reports (syntax, unknown column,
    ///   unable to open the file)
    pub fn execute(&self, sql: &str) -> Result<ResultSet> {
        let namespace = self.path.display().to_string();
        let span = db_query_span(sql, &namespace);
        let _entered = span.enter();

        if sql.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        self.guard.check(sql)?;

        let conn = self.open()?;
        let result = {
            let mut batch = Batch::new(&conn, sql);
            let mut stmt = batch.next()?.ok_or(Error::EmptyQuery)?;
            // The tail is only compiled, never stepped. A tail that fails to
            // compile is still a second statement.
            if !matches!(batch.next(), Ok(None)) {
                return Err(Error::MultipleStatements);
            }

            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let width = stmt.column_count();

            let mut rows = Vec::new();
            let mut cursor = stmt.query([])?;
            while let Some(row) = cursor.next()? {
                let mut values = Vec::with_capacity(width);
                for index in 0..width {
                    values.push(Value::from(row.get_ref(index)?));
                }
                rows.push(Row(values));
            }

            ResultSet { columns, rows }
        };
        // Early returns above drop the connection; here we also surface close errors.
        conn.close().map_err(|(_, e)| Error::Sql(e))?;

        record_returned_rows(&span, result.len());
        tracing::debug!(rows = result.len(), "statement executed");
        Ok(result)
    }

    /// Run `execute` on the blocking pool.
    pub async fn execute_async(&self, sql: String) -> Result<ResultSet> {
        let executor = self.clone();
        tokio::task::spawn_blocking(move || executor.execute(&sql))
            .await
            .map_err(|e| Error::Internal(format!("query task failed: {}", e)))?
    }
}
