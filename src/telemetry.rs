//! Tracing spans for the pipeline stages.
//!
//! Attribute names follow the OpenTelemetry semantic conventions so the spans
//! read the same in any subscriber:
//! - https://opentelemetry.io/docs/specs/semconv/database/database-spans/
//! - https://opentelemetry.io/docs/specs/semconv/gen-ai/
//!
//! **Database spans** (`db.query`): `db.system.name` is always `"sqlite"`,
//! `db.namespace` is the database file, `db.query.text` the statement as
//! executed.
//!
//! **Completion spans** (`llm.complete`): `gen_ai.system` and
//! `gen_ai.request.model`.

use tracing::{span, Level, Span};
use uuid::Uuid;

/// Span covering one question from submission to rendered rows.
pub fn request_span(request_id: Uuid, surface: &'static str) -> Span {
    span!(
        Level::INFO,
        "ask",
        request.id = %request_id,
        surface = surface,
    )
}

/// Span for one statement execution.
///
/// # Arguments
///
/// * `query_text` - Statement exactly as it will be executed
/// * `namespace` - Database file path
///
/// # Example
///
/// ```rust,ignore
/// let span = db_query_span("SELECT COUNT(*) FROM STUDENT;", "student.db");
/// let _guard = span.enter();
/// ```
pub fn db_query_span(query_text: &str, namespace: &str) -> Span {
    span!(
        Level::INFO,
        "db.query",
        otel.kind = "client",
        db.system.name = "sqlite",
        db.namespace = namespace,
        db.query.text = query_text,
        db.response.returned_rows = tracing::field::Empty,
    )
}

/// Record how many rows a statement returned on its span.
pub fn record_returned_rows(span: &Span, rows: usize) {
    span.record("db.response.returned_rows", rows);
}

/// Span for one completion request.
pub fn llm_span(provider: &str, model: &str) -> Span {
    span!(
        Level::INFO,
        "llm.complete",
        otel.kind = "client",
        gen_ai.system = provider,
        gen_ai.request.model = model,
    )
}
