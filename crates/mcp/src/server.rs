// MCP server loop: newline-delimited JSON-RPC 2.0 over stdio.
//
// One message per line; stdout carries the protocol, so nothing else may
// write to it. Per-call failures become error tool-results and the loop
// keeps serving.

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use eka_sdk::EkaError;
use futures::StreamExt;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec};

pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Serve until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve over arbitrary byte streams (tests drive this with in-memory
    /// buffers).
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new());

        while let Some(line) = lines.next().await {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut payload = serde_json::to_string(&response)?;
                payload.push('\n');
                writer.write_all(payload.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("client closed the stream, shutting down");
        Ok(())
    }

    /// Handle one wire message; `None` means nothing goes back (notification
    /// or unparseable notification).
    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "unparseable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                JsonRpcError::invalid_request(),
            ));
        }

        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        Some(self.handle_request(id, &request).await)
    }

    async fn handle_request(&self, id: Value, request: &JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: env!("CARGO_PKG_NAME").to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                };
                match serde_json::to_value(result) {
                    Ok(value) => JsonRpcResponse::success(id, value),
                    Err(err) => JsonRpcResponse::error(
                        id,
                        JsonRpcError::internal_error(err.to_string()),
                    ),
                }
            }
            "ping" => JsonRpcResponse::success(id, Value::Object(Default::default())),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.registry.list_schemas(),
                };
                match serde_json::to_value(result) {
                    Ok(value) => JsonRpcResponse::success(id, value),
                    Err(err) => JsonRpcResponse::error(
                        id,
                        JsonRpcError::internal_error(err.to_string()),
                    ),
                }
            }
            "tools/call" => self.handle_tool_call(id, request.params.clone()).await,
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        }
    }

    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams =
            match serde_json::from_value(params.unwrap_or(Value::Null)) {
                Ok(params) => params,
                Err(err) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("invalid tool call params: {err}")),
                    )
                }
            };

        let result = match self.registry.get(&params.name) {
            Some(tool) => {
                tracing::info!(tool = %params.name, "tool call");
                match tool.execute(params.arguments).await {
                    Ok(result) => result,
                    Err(err) => {
                        tracing::error!(tool = %params.name, error = %err, "tool call failed");
                        CallToolResult::error(render_tool_error(&err))
                    }
                }
            }
            None => CallToolResult::error(format!("tool not found: {}", params.name)),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => {
                JsonRpcResponse::error(id, JsonRpcError::internal_error(err.to_string()))
            }
        }
    }
}

/// Render a tool failure for the LLM client. Transient upstream failures are
/// labelled retryable so the caller knows the same request may succeed later.
fn render_tool_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<EkaError>() {
        Some(api_err) if api_err.is_retryable() => {
            format!("upstream unavailable (retryable): {api_err}")
        }
        _ => format!("{err:#}"),
    }
}
