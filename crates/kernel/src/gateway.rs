//! Kernel Gateway session — REST lifecycle plus WebSocket execution.
//!
//! One session manages at most one kernel. `start` is idempotent,
//! `shutdown` is an idempotent no-op when nothing is running, and
//! `execute` drains incremental results with a bounded per-message
//! timeout: if the completion notification never arrives, whatever
//! partial output was collected is returned as a successful result.

use async_trait::async_trait;
use codeact_core::error::SessionError;
use codeact_core::session::{ExecutionOutput, ExecutionSession};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite;
use tracing::{debug, info, warn};

/// A Jupyter Kernel Gateway execution session.
pub struct KernelGatewaySession {
    http_url: String,
    ws_url: String,
    execute_timeout: Duration,
    kernel_id: Mutex<Option<String>>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct KernelInfo {
    id: String,
}

impl KernelGatewaySession {
    /// Create a session against a gateway base URL (e.g.
    /// `http://code-executor:8888`).
    pub fn new(gateway_url: &str, execute_timeout: Duration) -> Self {
        let http_url = gateway_url.trim_end_matches('/').to_string();
        Self {
            ws_url: to_ws_url(&http_url),
            http_url,
            execute_timeout,
            kernel_id: Mutex::new(None),
            client: reqwest::Client::new(),
        }
    }
}

/// Swap the URL scheme for the WebSocket one (`http` → `ws`, `https` → `wss`).
fn to_ws_url(http_url: &str) -> String {
    match http_url.split_once("://") {
        Some(("https", rest)) => format!("wss://{rest}"),
        Some((_, rest)) => format!("ws://{rest}"),
        None => format!("ws://{http_url}"),
    }
}

#[async_trait]
impl ExecutionSession for KernelGatewaySession {
    async fn start(&self) -> std::result::Result<String, SessionError> {
        let mut guard = self.kernel_id.lock().await;

        if let Some(id) = guard.as_ref() {
            info!(kernel_id = %id, "Kernel already running, reusing");
            return Ok(id.clone());
        }

        let url = format!("{}/api/kernels", self.http_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| SessionError::GatewayUnreachable(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SessionError::StartFailed {
                status_code: status,
                message,
            });
        }

        let kernel: KernelInfo = response
            .json()
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?;

        info!(kernel_id = %kernel.id, "Kernel started");
        *guard = Some(kernel.id.clone());
        Ok(kernel.id)
    }

    async fn execute(&self, code: &str) -> std::result::Result<ExecutionOutput, SessionError> {
        let kernel_id = {
            let guard = self.kernel_id.lock().await;
            guard.clone().ok_or(SessionError::NotStarted)?
        };

        let url = format!("{}/api/kernels/{}/channels", self.ws_url, kernel_id);
        let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(|e| SessionError::Channel(format!("failed to connect to {url}: {e}")))?;

        let (mut sink, mut stream) = ws_stream.split();

        let (request, msg_id) = crate::protocol::execute_request(code);
        let json = serde_json::to_string(&request)
            .map_err(|e| SessionError::Protocol(e.to_string()))?;

        sink.send(tungstenite::Message::Text(json.into()))
            .await
            .map_err(|e| SessionError::Channel(e.to_string()))?;

        debug!(kernel_id = %kernel_id, msg_id = %msg_id, code_len = code.len(), "Execute request sent");

        let mut acc = crate::protocol::OutputAccumulator::default();

        loop {
            let next = tokio::time::timeout(self.execute_timeout, stream.next()).await;

            let frame = match next {
                // Per-message drain timeout: partial output is a success,
                // not an error.
                Err(_) => {
                    warn!(
                        kernel_id = %kernel_id,
                        timeout_secs = self.execute_timeout.as_secs(),
                        "Timed out waiting for kernel reply; returning partial output"
                    );
                    break;
                }
                Ok(None) => break,
                Ok(Some(frame)) => frame.map_err(|e| SessionError::Channel(e.to_string()))?,
            };

            match frame {
                tungstenite::Message::Text(text) => {
                    let msg: crate::protocol::KernelMessage = match serde_json::from_str(&text) {
                        Ok(msg) => msg,
                        Err(e) => {
                            debug!(error = %e, "Ignoring unparseable kernel message");
                            continue;
                        }
                    };
                    if acc.fold(&msg, &msg_id) {
                        break;
                    }
                }
                tungstenite::Message::Close(_) => break,
                _ => {}
            }
        }

        Ok(ExecutionOutput {
            stdout: acc.stdout,
            stderr: acc.stderr,
        })
    }

    async fn shutdown(&self) -> std::result::Result<(), SessionError> {
        let mut guard = self.kernel_id.lock().await;

        let Some(id) = guard.take() else {
            info!("No kernel to shut down");
            return Ok(());
        };

        let url = format!("{}/api/kernels/{}", self.http_url, id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| SessionError::GatewayUnreachable(e.to_string()))?;

        if response.status().as_u16() == 204 {
            info!(kernel_id = %id, "Kernel shut down");
        } else {
            warn!(
                kernel_id = %id,
                status = response.status().as_u16(),
                "Kernel shutdown returned unexpected status"
            );
        }

        Ok(())
    }
}
