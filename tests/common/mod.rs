//! Shared fixtures: a seeded STUDENT database and a canned completion provider.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use talkdb::storage::create_demo_database;
use talkdb::{CompletionProvider, QueryExecutor, Result, TextToSql};
use tempfile::TempDir;

/// Completion provider that always answers with the same text.
pub struct MockLlm {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Temp dir holding `student.db` seeded with the five demo rows.
pub fn seeded_database() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("student.db");
    create_demo_database(&path, false).unwrap();
    (dir, path)
}

/// Pipeline over a seeded database whose model always replies `reply`.
pub fn pipeline_replying(reply: &str) -> (TempDir, Arc<MockLlm>, TextToSql) {
    let (dir, path) = seeded_database();
    let llm = MockLlm::new(reply);
    let pipeline = TextToSql::new(llm.clone(), QueryExecutor::new(path));
    (dir, llm, pipeline)
}
