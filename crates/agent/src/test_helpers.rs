//! Shared mock collaborators for the loop tests.

use std::sync::Mutex;

use async_trait::async_trait;
use codeact_core::{
    ExecutionOutput, ExecutionSession, KnowledgeError, KnowledgeRetriever, Provider,
    ProviderError, ProviderRequest, ProviderResponse, SessionError,
};

/// A provider that replays scripted responses in order and records every
/// request it receives. Panics when the script runs out, which surfaces an
/// unexpected extra completion call as a test failure.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<String>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<String>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let content = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .expect("mock provider received more requests than it was scripted for");
        Ok(ProviderResponse {
            content,
            usage: None,
            model: "mock".to_string(),
        })
    }
}

/// A session that replays scripted execution outputs and counts lifecycle
/// calls.
pub struct MockSession {
    outputs: Mutex<Vec<ExecutionOutput>>,
    executed: Mutex<Vec<String>>,
    start_calls: Mutex<u32>,
    shutdown_calls: Mutex<u32>,
    fail_execute: bool,
}

impl MockSession {
    pub fn new(outputs: Vec<ExecutionOutput>) -> Self {
        let mut outputs = outputs;
        outputs.reverse();
        Self {
            outputs: Mutex::new(outputs),
            executed: Mutex::new(Vec::new()),
            start_calls: Mutex::new(0),
            shutdown_calls: Mutex::new(0),
            fail_execute: false,
        }
    }

    /// A session whose every `execute` fails with a channel error.
    pub fn failing_execute() -> Self {
        let mut session = Self::new(Vec::new());
        session.fail_execute = true;
        session
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn start_calls(&self) -> u32 {
        *self.start_calls.lock().unwrap()
    }

    pub fn shutdown_calls(&self) -> u32 {
        *self.shutdown_calls.lock().unwrap()
    }
}

#[async_trait]
impl ExecutionSession for MockSession {
    async fn start(&self) -> Result<String, SessionError> {
        *self.start_calls.lock().unwrap() += 1;
        Ok("mock-kernel".to_string())
    }

    async fn execute(&self, code: &str) -> Result<ExecutionOutput, SessionError> {
        self.executed.lock().unwrap().push(code.to_string());
        if self.fail_execute {
            return Err(SessionError::Channel(
                "websocket closed unexpectedly".to_string(),
            ));
        }
        self.outputs
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| SessionError::Channel("mock session script exhausted".to_string()))
    }

    async fn shutdown(&self) -> Result<(), SessionError> {
        *self.shutdown_calls.lock().unwrap() += 1;
        Ok(())
    }
}

/// A retriever with a fixed result set that records every query.
pub struct MockRetriever {
    snippets: Vec<String>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockRetriever {
    pub fn new(snippets: Vec<String>) -> Self {
        Self {
            snippets,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeRetriever for MockRetriever {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, KnowledgeError> {
        self.queries.lock().unwrap().push((query.to_string(), k));
        Ok(self.snippets.iter().take(k).cloned().collect())
    }
}
