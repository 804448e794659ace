//! LLM-powered natural language to SQL: prompt template and completion client.

pub mod client;
pub mod prompt;

pub use client::{CompletionProvider, LlmClient, LlmProvider, DEFAULT_MODEL};
pub use prompt::{build_prompt, PromptBuilder, TableSchema, STUDENT_TABLE};
