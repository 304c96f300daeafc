//! Line-delimited JSON-RPC server over any async byte stream.
//!
//! One JSON message per line in each direction. `tools/call` requests run
//! concurrently on their own tasks so that `notifications/cancelled` can
//! reach them mid-aggregation; every other method is answered inline.
//! Responses are written by a single writer task in completion order.

use crate::protocol::{
    CallToolParams, CallToolResult, CancelledParams, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, Request, Response,
    RpcError,
};
use crate::registry::ToolRegistry;
use notebridge_core::AbortHandle;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Name and version reported by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

type InFlight = Arc<Mutex<HashMap<String, AbortHandle>>>;

fn lock(in_flight: &InFlight) -> MutexGuard<'_, HashMap<String, AbortHandle>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map key for a request id; JSON text keeps `1` and `"1"` apart.
fn request_key(id: &Value) -> String {
    id.to_string()
}

/// Serves a [`ToolRegistry`] over JSON-RPC.
#[derive(Debug, Clone)]
pub struct ToolServer {
    registry: ToolRegistry,
    info: ServerInfo,
    in_flight: InFlight,
}

impl ToolServer {
    /// Create a server for `registry`.
    #[must_use]
    pub fn new(registry: ToolRegistry, info: ServerInfo) -> Self {
        Self {
            registry,
            info,
            in_flight: Arc::default(),
        }
    }

    /// Number of `tools/call` requests still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Read requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Returns once the input is exhausted and every in-flight call has
    /// answered.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from reading the input or writing responses.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            self.handle_line(&line, &tx);
        }
        tracing::info!("input closed, waiting for in-flight calls");

        drop(tx);
        writer_task.await.map_err(io::Error::other)?
    }

    fn handle_line(&self, line: &str, tx: &mpsc::UnboundedSender<Response>) {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                let error = RpcError::new(PARSE_ERROR, format!("Parse error: {e}"));
                send(tx, Response::error(Value::Null, error));
                return;
            }
        };
        let fallback_id = raw.get("id").cloned().unwrap_or(Value::Null);

        let request: Request = match serde_json::from_value::<Request>(raw) {
            Ok(request) if request.jsonrpc == "2.0" => request,
            Ok(_) => {
                let error = RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\"");
                send(tx, Response::error(fallback_id, error));
                return;
            }
            Err(e) => {
                let error = RpcError::new(INVALID_REQUEST, format!("Invalid request: {e}"));
                send(tx, Response::error(fallback_id, error));
                return;
            }
        };

        match request.id {
            None => self.handle_notification(&request.method, request.params),
            Some(id) => self.handle_request(id, &request.method, request.params, tx),
        }
    }

    fn handle_notification(&self, method: &str, params: Value) {
        match method {
            "notifications/cancelled" => {
                let Ok(params) = serde_json::from_value::<CancelledParams>(params) else {
                    tracing::warn!("ignoring malformed cancellation");
                    return;
                };
                let handle = lock(&self.in_flight).remove(&request_key(&params.request_id));
                match handle {
                    Some(handle) => {
                        tracing::info!(
                            request_id = %params.request_id,
                            reason = params.reason.as_deref().unwrap_or(""),
                            "cancelling tool call"
                        );
                        handle.abort();
                    }
                    None => {
                        tracing::debug!(request_id = %params.request_id, "nothing to cancel");
                    }
                }
            }
            other => tracing::debug!(method = other, "ignoring notification"),
        }
    }

    fn handle_request(
        &self,
        id: Value,
        method: &str,
        params: Value,
        tx: &mpsc::UnboundedSender<Response>,
    ) {
        tracing::debug!(%id, method, "request");
        let response = match method {
            "initialize" => {
                let version = params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(PROTOCOL_VERSION);
                Response::result(
                    id,
                    json!({
                        "protocolVersion": version,
                        "capabilities": {"tools": {"listChanged": false}},
                        "serverInfo": {"name": self.info.name, "version": self.info.version},
                    }),
                )
            }
            "ping" => Response::result(id, json!({})),
            "tools/list" => Response::result(id, json!({"tools": self.registry.get_tools()})),
            "tools/call" => match serde_json::from_value::<CallToolParams>(params) {
                Ok(params) => {
                    self.spawn_call(id, params, tx.clone());
                    return;
                }
                Err(e) => Response::error(
                    id,
                    RpcError::new(INVALID_PARAMS, format!("Invalid tools/call params: {e}")),
                ),
            },
            other => Response::error(
                id,
                RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}")),
            ),
        };
        send(tx, response);
    }

    fn spawn_call(&self, id: Value, params: CallToolParams, tx: mpsc::UnboundedSender<Response>) {
        let key = request_key(&id);
        let (handle, signal) = AbortHandle::pair();
        {
            let mut in_flight = lock(&self.in_flight);
            if in_flight.contains_key(&key) {
                drop(in_flight);
                tracing::warn!(%id, "request id already in flight");
                let error =
                    RpcError::new(INVALID_REQUEST, format!("Request id {id} is already in flight"));
                send(&tx, Response::error(id, error));
                return;
            }
            in_flight.insert(key.clone(), handle);
        }

        let registry = self.registry.clone();
        let in_flight = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            tracing::info!(%id, tool = %params.name, "tool call");
            let outcome = registry.execute(&params.name, params.arguments, signal).await;

            // A cancelled request has already been removed and gets no answer.
            if lock(&in_flight).remove(&key).is_none() {
                tracing::debug!(%id, "dropping response to cancelled call");
                return;
            }

            let response = match outcome {
                Ok(envelope) => match CallToolResult::from_envelope(&envelope)
                    .and_then(serde_json::to_value)
                {
                    Ok(result) => Response::result(id, result),
                    Err(e) => Response::error(
                        id,
                        RpcError::new(INTERNAL_ERROR, format!("encoding result: {e}")),
                    ),
                },
                Err(e) => Response::error(id, RpcError::new(INVALID_PARAMS, e.to_string())),
            };
            send(&tx, response);
        });
    }
}

fn send(tx: &mpsc::UnboundedSender<Response>, response: Response) {
    if tx.send(response).is_err() {
        tracing::warn!("response writer has stopped");
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Response>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = match serde_json::to_string(&response) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "could not encode response");
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_request_keys_distinguish_types() {
        assert_ne!(request_key(&json!(1)), request_key(&json!("1")));
        assert_eq!(request_key(&json!("a")), "\"a\"");
    }

    #[tokio::test]
    async fn test_malformed_lines_get_errors() {
        let server = ToolServer::new(
            ToolRegistry::new(),
            ServerInfo {
                name: "t".to_string(),
                version: "0".to_string(),
            },
        );
        let input = b"{not json\n{\"jsonrpc\":\"1.0\",\"id\":3,\"method\":\"ping\"}\n\n".to_vec();
        let (mut client, server_io) = tokio::io::duplex(64 * 1024);

        server.serve(input.as_slice(), server_io).await.unwrap();

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        let responses: Vec<Response> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Value::Null);
        assert_eq!(responses[0].error.as_ref().unwrap().code, PARSE_ERROR);
        assert_eq!(responses[1].id, json!(3));
        assert_eq!(responses[1].error.as_ref().unwrap().code, INVALID_REQUEST);
    }
}
