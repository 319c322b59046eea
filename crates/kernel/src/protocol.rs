//! Jupyter wire protocol (v5.3) message construction and folding.
//!
//! These are pure functions so the drain logic is testable without a live
//! gateway: `execute_request` builds the outbound envelope, and
//! `OutputAccumulator::fold` turns each inbound channel message into
//! collected stdout/stderr until the kernel reports idle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound `execute_request` envelope.
#[derive(Debug, Serialize)]
pub struct ExecuteRequest {
    pub header: MessageHeader,
    pub metadata: serde_json::Value,
    pub content: ExecuteContent,
    pub buffers: Vec<serde_json::Value>,
    pub parent_header: serde_json::Value,
    pub channel: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageHeader {
    pub msg_id: String,
    pub username: String,
    pub session: String,
    pub msg_type: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ExecuteContent {
    pub code: String,
    pub silent: bool,
    pub store_history: bool,
    pub user_expressions: serde_json::Value,
    pub allow_stdin: bool,
}

/// Build an `execute_request` for `code`. Returns the envelope and its
/// `msg_id`, which inbound messages are matched against.
pub fn execute_request(code: &str) -> (ExecuteRequest, String) {
    let msg_id = Uuid::new_v4().simple().to_string();
    let request = ExecuteRequest {
        header: MessageHeader {
            msg_id: msg_id.clone(),
            username: "agent".into(),
            session: Uuid::new_v4().simple().to_string(),
            msg_type: "execute_request".into(),
            version: "5.3".into(),
        },
        metadata: serde_json::json!({}),
        content: ExecuteContent {
            code: code.into(),
            silent: false,
            store_history: true,
            user_expressions: serde_json::json!({}),
            allow_stdin: false,
        },
        buffers: Vec::new(),
        parent_header: serde_json::json!({}),
        channel: "shell".into(),
    };
    (request, msg_id)
}

/// Inbound kernel message, deserialized loosely — only the fields the
/// accumulator needs.
#[derive(Debug, Deserialize)]
pub struct KernelMessage {
    pub header: InboundHeader,
    #[serde(default)]
    pub parent_header: ParentHeader,
    #[serde(default)]
    pub content: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct InboundHeader {
    pub msg_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ParentHeader {
    #[serde(default)]
    pub msg_id: Option<String>,
}

/// Collects incremental stdout/stderr for one execute request.
#[derive(Debug, Default)]
pub struct OutputAccumulator {
    pub stdout: String,
    pub stderr: String,
}

impl OutputAccumulator {
    /// Fold one inbound message. Returns `true` when the kernel has gone
    /// idle for our request (execution finished).
    ///
    /// - `stream` messages append to stdout or stderr by name
    /// - `error` messages append `"{ename}: {evalue}"` to stderr
    /// - `status` with `execution_state == "idle"` ends the drain
    ///
    /// Messages that are replies to other requests are ignored.
    pub fn fold(&mut self, msg: &KernelMessage, parent_msg_id: &str) -> bool {
        if msg.parent_header.msg_id.as_deref() != Some(parent_msg_id) {
            return false;
        }

        match msg.header.msg_type.as_str() {
            "stream" => {
                let text = msg.content["text"].as_str().unwrap_or_default();
                match msg.content["name"].as_str() {
                    Some("stdout") => self.stdout.push_str(text),
                    Some("stderr") => self.stderr.push_str(text),
                    _ => {}
                }
                false
            }
            "error" => {
                let ename = msg.content["ename"].as_str().unwrap_or_default();
                let evalue = msg.content["evalue"].as_str().unwrap_or_default();
                self.stderr.push_str(&format!("{ename}: {evalue}"));
                false
            }
            "status" => msg.content["execution_state"].as_str() == Some("idle"),
            _ => false,
        }
    }
}
