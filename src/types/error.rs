//! Error types for the question-to-rows pipeline.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` implementations.
//! Every variant ends up rendered the same way (`Error: <message>`); the
//! variants exist so callers that care (the JSON API, logs) can tell where a
//! submission failed.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures a submission can run into.
#[derive(Error, Debug)]
pub enum Error {
    /// Completion service returned something unusable (bad status, bad body, no choices)
    #[error("LLM completion failed: {0}")]
    Llm(String),

    /// Transport-level failure talking to the completion service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SQLite rejected or failed to run the statement
    #[error("{0}")]
    Sql(#[from] rusqlite::Error),

    /// Generated query was empty or whitespace only
    #[error("incomplete input: empty SQL statement (syntax error)")]
    EmptyQuery,

    /// More than one statement in the generated text
    #[error("You can only execute one statement at a time.")]
    MultipleStatements,

    /// Statement refused by the read-only guard
    #[error("Statement rejected: {0}")]
    Rejected(String),

    /// Missing credential, unreadable config file, bad setting
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV rendering error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal error (blocking task panicked, server failed to bind)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an LLM error with context.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a configuration error with context.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure happened before any SQL ran.
    ///
    /// # Returns
    ///
    /// `true` for completion-side failures (credential, transport, response body)
    pub fn is_completion_failure(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::Http(_) | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::llm("no choices").to_string(),
            "LLM completion failed: no choices"
        );
        assert_eq!(
            Error::config("GROQ_API_KEY not set").to_string(),
            "Configuration error: GROQ_API_KEY not set"
        );
        assert!(Error::EmptyQuery.to_string().contains("syntax error"));
        assert_eq!(
            Error::MultipleStatements.to_string(),
            "You can only execute one statement at a time."
        );
    }

    #[test]
    fn test_sql_error_is_verbatim() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.to_string(), rusqlite::Error::InvalidQuery.to_string());
    }

    #[test]
    fn test_completion_failure_classification() {
        assert!(Error::llm("x").is_completion_failure());
        assert!(Error::config("x").is_completion_failure());
        assert!(!Error::EmptyQuery.is_completion_failure());
        assert!(!Error::MultipleStatements.is_completion_failure());
        assert!(!Error::Rejected("DELETE".into()).is_completion_failure());
    }
}
