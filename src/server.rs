//! Web form: one text box, one button, the query and its rows (or the error).
//!
//! - `GET /` empty form
//! - `POST /` urlencoded `question`, answered on the same page
//! - `POST /api/ask` JSON `{"question": ...}` for scripts
//! - `GET /health` liveness

use crate::pipeline::TextToSql;
use crate::render::{error_message, render_page, PageBody};
use crate::types::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<TextToSql>,
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// Build the router around a pipeline.
pub fn router(pipeline: Arc<TextToSql>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/ask", post(api_ask))
        .route("/health", get(health))
        .with_state(AppState { pipeline })
}

/// Serve the form on `addr` until the process is stopped.
pub async fn serve(addr: SocketAddr, pipeline: Arc<TextToSql>) -> Result<()> {
    let server = axum::Server::try_bind(&addr)
        .map_err(|e| Error::Internal(format!("cannot bind {}: {}", addr, e)))?;

    tracing::info!(%addr, model = pipeline.model(), "serving web form");

    server
        .serve(router(pipeline).into_make_service())
        .await
        .map_err(|e| Error::Internal(format!("server error: {}", e)))
}

async fn index() -> Html<String> {
    Html(render_page("", PageBody::Empty))
}

async fn submit(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let page = match state.pipeline.ask_from(&form.question, "web").await {
        Ok(answer) => render_page(&form.question, PageBody::Answer(&answer)),
        Err(err) => {
            tracing::warn!(error = %err, "question failed");
            render_page(&form.question, PageBody::Failure(&err))
        }
    };
    Html(page)
}

async fn api_ask(State(state): State<AppState>, Json(form): Json<AskForm>) -> Response {
    match state.pipeline.ask_from(&form.question, "api").await {
        Ok(answer) => Json(answer).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "question failed");
            let status = if err.is_completion_failure() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, Json(json!({ "error": error_message(&err) }))).into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
