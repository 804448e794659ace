//! Demo STUDENT database for trying the tool out.
//!
//! Only the `init` command calls this. The question pipeline never creates
//! or migrates a schema.

use crate::llm::prompt::STUDENT_TABLE;
use crate::types::{Error, Result};
use rusqlite::{params, Connection};
use std::path::Path;

/// Sample rows: (NAME, COURSE, SECTION, MARKS).
pub const DEMO_STUDENTS: [(&str, &str, &str, i64); 5] = [
    ("Krish", "Data Science", "A", 90),
    ("Sudhanshu", "Data Science", "B", 100),
    ("Darius", "Data Science", "A", 86),
    ("Vikash", "DEVOPS", "A", 50),
    ("Dipesh", "DEVOPS", "A", 35),
];

/// Create the STUDENT table at `path` and fill it with `DEMO_STUDENTS`.
///
/// # Arguments
///
/// * `path` - Database file to create
/// * `force` - Replace an existing file instead of failing
///
/// # Returns
///
/// Number of rows inserted
///
/// # Errors
///
/// Returns `Error::Config` if the file exists and `force` is false
pub fn create_demo_database(path: &Path, force: bool) -> Result<usize> {
    if path.exists() {
        if !force {
            return Err(Error::config(format!(
                "{} already exists (use --force to replace it)",
                path.display()
            )));
        }
        std::fs::remove_file(path)?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path)?;
    conn.execute_batch(&format!(
        "CREATE TABLE {} (NAME VARCHAR(25), COURSE VARCHAR(25), SECTION VARCHAR(25), MARKS INT);",
        STUDENT_TABLE.name
    ))?;

    let tx = conn.transaction()?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} (NAME, COURSE, SECTION, MARKS) VALUES (?1, ?2, ?3, ?4)",
            STUDENT_TABLE.name
        ))?;
        for (name, course, section, marks) in DEMO_STUDENTS {
            insert.execute(params![name, course, section, marks])?;
        }
    }
    tx.commit()?;

    tracing::info!(path = %path.display(), rows = DEMO_STUDENTS.len(), "demo database created");
    Ok(DEMO_STUDENTS.len())
}
