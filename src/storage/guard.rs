//! Optional validation of generated SQL before it reaches the database.
//!
//! Model output is executable text. Without a guard any statement the model
//! produces runs, `DROP TABLE` included. `ReadOnly` parses the text and only
//! lets a single `SELECT` through.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlparser::ast::{SetExpr, Statement};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

/// How much the executor trusts generated SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementGuard {
    /// Execute whatever arrives
    #[default]
    Unchecked,
    /// Single SELECT only; connection opened read-only
    ReadOnly,
}

impl StatementGuard {
    pub fn from_read_only(read_only: bool) -> Self {
        if read_only {
            StatementGuard::ReadOnly
        } else {
            StatementGuard::Unchecked
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, StatementGuard::ReadOnly)
    }

    /// Check `sql` against the guard.
    ///
    /// # Errors
    ///
    /// - `Error::Rejected` if the text does not parse or is not a single SELECT
    /// - `Error::EmptyQuery` if the text parses to no statements
    pub fn check(&self, sql: &str) -> Result<()> {
        match self {
            StatementGuard::Unchecked => Ok(()),
            StatementGuard::ReadOnly => {
                let statements = Parser::parse_sql(&SQLiteDialect {}, sql)
                    .map_err(|e| Error::Rejected(format!("could not parse SQL: {}", e)))?;

                match statements.as_slice() {
                    [] => Err(Error::EmptyQuery),
                    [Statement::Query(query)] if !writes(query.body.as_ref()) => Ok(()),
                    [statement] => Err(Error::Rejected(format!(
                        "read-only mode only runs SELECT queries, got: {}",
                        statement
                    ))),
                    many => Err(Error::Rejected(format!(
                        "expected a single statement, got {}",
                        many.len()
                    ))),
                }
            }
        }
    }
}

/// `WITH ... INSERT/UPDATE` parses as a query whose body writes.
fn writes(body: &SetExpr) -> bool {
    matches!(body, SetExpr::Insert(_) | SetExpr::Update(_))
}
