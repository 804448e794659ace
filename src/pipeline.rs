//! Question → prompt → completion → execution.
//!
//! Strictly linear: no branching on the generated text, no retries, no
//! fallback queries. Whatever fails first is returned to the caller, which
//! renders it as a single error message.

use crate::llm::{CompletionProvider, PromptBuilder};
use crate::storage::QueryExecutor;
use crate::telemetry::request_span;
use crate::types::{Error, ResultSet, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Successful outcome of one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Question as submitted
    pub question: String,

    /// SQL the model produced, as executed
    pub query: String,

    /// Rows the statement returned
    #[serde(flatten)]
    pub result: ResultSet,
}

/// Wires prompt builder, completion provider and executor together.
pub struct TextToSql {
    prompts: PromptBuilder,
    provider: Arc<dyn CompletionProvider>,
    executor: QueryExecutor,
}

impl TextToSql {
    pub fn new(provider: Arc<dyn CompletionProvider>, executor: QueryExecutor) -> Self {
        Self {
            prompts: PromptBuilder::default(),
            provider,
            executor,
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Answer `question` with rows from the database.
    ///
    /// # Arguments
    ///
    /// * `question` - Natural language question, passed through unvalidated
    ///
    /// # Errors
    ///
    /// Any completion or execution failure, unchanged
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.ask_from(question, "library").await
    }

    /// `ask`, tagging the request span with the surface that submitted it.
    pub async fn ask_from(&self, question: &str, surface: &'static str) -> Result<Answer> {
        let request_id = Uuid::new_v4();
        async {
            let prompt = self.prompts.build(question);
            let query = self.provider.complete(&prompt).await?;
            tracing::info!(query = %query, "generated query");

            let result = self.executor.execute_async(query.clone()).await?;
            tracing::info!(rows = result.len(), "question answered");

            Ok::<_, Error>(Answer {
                question: question.to_string(),
                query,
                result,
            })
        }
        .instrument(request_span(request_id, surface))
        .await
    }
}
