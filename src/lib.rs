//! TalkDB - ask a SQLite database questions in plain English.
//!
//! A question is dropped into a fixed prompt template, sent to a hosted
//! completion model, and whatever SQL comes back is executed against a local
//! database file. The rows (or the first error) are shown to the user.
//!
//! Can be used as:
//! - Library (`TextToSql` with any `CompletionProvider`)
//! - CLI (`talkdb ask`, `talkdb shell`)
//! - Web form (`talkdb serve`)
//!
//! The generated SQL is trusted. See `storage::StatementGuard` for the
//! opt-in read-only mode.

pub mod config;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod types;

pub use config::Config;
pub use llm::{build_prompt, CompletionProvider, LlmClient};
pub use pipeline::{Answer, TextToSql};
pub use storage::{QueryExecutor, StatementGuard};
pub use types::{Error, Result, ResultSet, Row, Value};
