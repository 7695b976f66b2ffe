//! HTTP tool dispatcher
//!
//! Implements [`ToolDispatcher`] on top of `reqwest`. The method decides the
//! shape of the call:
//!
//! | Method | Parameters | Result |
//! |--------|------------|--------|
//! | GET, DELETE | query string | decoded response body |
//! | POST | JSON body | decoded response body |
//! | PUT | JSON body | `{"status": "success"}` |
//! | PATCH, HEAD, OPTIONS | none | rejected, no request sent |
//!
//! The overall deadline of a call is enforced by the orchestrator; only the
//! connect phase is bounded here.

use crate::config::FileDispatchConfig;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use toolflow_application::ports::tool_dispatcher::{DispatchRequest, ToolDispatcher};
use toolflow_domain::{HttpMethod, InvocationFault};
use tracing::debug;

/// Maximum number of characters of an error body kept in a fault message
const MAX_ERROR_BODY: usize = 500;

/// Dispatcher that calls tool endpoints over HTTP
pub struct HttpToolDispatcher {
    client: reqwest::Client,
    connect_timeout: Duration,
}

impl HttpToolDispatcher {
    pub fn new(config: &FileDispatchConfig) -> Result<Self, reqwest::Error> {
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            client,
            connect_timeout,
        })
    }

    fn transport_fault(&self, tool: &str, error: reqwest::Error) -> InvocationFault {
        if error.is_timeout() {
            InvocationFault::timeout(tool, self.connect_timeout.as_millis() as u64)
        } else {
            InvocationFault::unexpected(tool, error.to_string())
        }
    }
}

#[async_trait]
impl ToolDispatcher for HttpToolDispatcher {
    async fn invoke(&self, request: &DispatchRequest) -> Result<serde_json::Value, InvocationFault> {
        let tool = request.tool_name.as_str();
        let endpoint = request.endpoint.as_str();

        let builder = match request.method {
            HttpMethod::Get => self.client.get(endpoint),
            HttpMethod::Delete => self.client.delete(endpoint),
            HttpMethod::Post => self.client.post(endpoint),
            HttpMethod::Put => self.client.put(endpoint),
            method => return Err(InvocationFault::unsupported_method(tool, method)),
        };
        let builder = if request.method.uses_query_parameters() {
            builder.query(&query_pairs(&request.parameters))
        } else {
            builder.json(&request.parameters)
        };

        debug!(tool, method = %request.method, endpoint, "Sending tool request");
        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_fault(tool, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                truncate(body.trim(), MAX_ERROR_BODY)
            };
            return Err(InvocationFault::remote(tool, status.as_u16(), message));
        }

        if request.method == HttpMethod::Put {
            return Ok(serde_json::json!({"status": "success"}));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_fault(tool, e))?;
        Ok(decode_body(&body))
    }
}

/// Render parameters as query pairs: strings verbatim, everything else as JSON.
fn query_pairs(parameters: &BTreeMap<String, serde_json::Value>) -> Vec<(String, String)> {
    parameters
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

/// JSON if the body parses, the raw text otherwise, null if empty.
fn decode_body(body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, answer with `status` and `body`, return the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&received[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&received).to_string()
        });

        (address, handle)
    }

    fn dispatcher() -> HttpToolDispatcher {
        HttpToolDispatcher::new(&FileDispatchConfig::default()).unwrap()
    }

    fn call(endpoint: String, method: HttpMethod) -> DispatchRequest {
        DispatchRequest {
            tool_name: "search".to_string(),
            endpoint,
            method,
            parameters: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_get_sends_query_parameters() {
        let (address, server) = serve_once("200 OK", r#"["lamp","desk lamp"]"#).await;
        let mut request = call(format!("{}/search", address), HttpMethod::Get);
        request
            .parameters
            .insert("keyword".to_string(), serde_json::json!("lamp"));
        request.parameters.insert("limit".to_string(), serde_json::json!(5));

        let result = dispatcher().invoke(&request).await.unwrap();
        assert_eq!(result, serde_json::json!(["lamp", "desk lamp"]));

        let raw = server.await.unwrap();
        let request_line = raw.lines().next().unwrap();
        assert!(request_line.starts_with("GET /search?"));
        assert!(request_line.contains("keyword=lamp"));
        assert!(request_line.contains("limit=5"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let (address, server) = serve_once("201 Created", r#"{"order_id":42}"#).await;
        let mut request = call(format!("{}/orders", address), HttpMethod::Post);
        request
            .parameters
            .insert("item".to_string(), serde_json::json!("lamp"));

        let result = dispatcher().invoke(&request).await.unwrap();
        assert_eq!(result, serde_json::json!({"order_id": 42}));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /orders"));
        assert!(raw.contains(r#"{"item":"lamp"}"#));
    }

    #[tokio::test]
    async fn test_put_synthesizes_success() {
        let (address, server) = serve_once("204 No Content", "").await;
        let request = call(format!("{}/profile", address), HttpMethod::Put);

        let result = dispatcher().invoke(&request).await.unwrap();
        assert_eq!(result, serde_json::json!({"status": "success"}));
        assert!(server.await.unwrap().starts_with("PUT /profile"));
    }

    #[tokio::test]
    async fn test_plain_text_body_becomes_string() {
        let (address, _server) = serve_once("200 OK", "sunny").await;
        let request = call(format!("{}/weather", address), HttpMethod::Get);

        let result = dispatcher().invoke(&request).await.unwrap();
        assert_eq!(result, serde_json::json!("sunny"));
    }

    #[tokio::test]
    async fn test_client_error_is_permanent() {
        let (address, _server) = serve_once("404 Not Found", r#"{"error":"no such item"}"#).await;
        let request = call(format!("{}/items/9", address), HttpMethod::Delete);

        let fault = dispatcher().invoke(&request).await.unwrap_err();
        assert!(matches!(fault, InvocationFault::Remote { status: 404, .. }));
        assert!(!fault.is_retryable());
        assert!(fault.to_string().contains("no such item"));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let (address, _server) = serve_once("503 Service Unavailable", "").await;
        let request = call(format!("{}/search", address), HttpMethod::Get);

        let fault = dispatcher().invoke(&request).await.unwrap_err();
        assert_eq!(
            fault,
            InvocationFault::remote("search", 503, "Service Unavailable")
        );
        assert!(fault.is_retryable());
    }

    #[tokio::test]
    async fn test_unsupported_method_sends_nothing() {
        let request = call("http://127.0.0.1:9/unused".to_string(), HttpMethod::Patch);
        let fault = dispatcher().invoke(&request).await.unwrap_err();
        assert_eq!(
            fault,
            InvocationFault::unsupported_method("search", HttpMethod::Patch)
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_unexpected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let request = call(format!("http://{}/search", address), HttpMethod::Get);
        let fault = dispatcher().invoke(&request).await.unwrap_err();
        assert!(matches!(fault, InvocationFault::Unexpected { .. }));
        assert!(fault.is_retryable());
    }

    #[test]
    fn test_query_pairs_render_json_values() {
        let mut parameters = BTreeMap::new();
        parameters.insert("name".to_string(), serde_json::json!("Oslo"));
        parameters.insert("days".to_string(), serde_json::json!(3));
        parameters.insert("tags".to_string(), serde_json::json!(["a", "b"]));
        parameters.insert("skip".to_string(), serde_json::Value::Null);

        let pairs = query_pairs(&parameters);
        assert_eq!(
            pairs,
            vec![
                ("days".to_string(), "3".to_string()),
                ("name".to_string(), "Oslo".to_string()),
                ("tags".to_string(), r#"["a","b"]"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
