//! Chat transport: the network call behind the conversation controller.
//!
//! The transport is a stateless request/response function. The controller
//! owns the whole conversation and replays it on every call.

use crate::chat::ChatRequest;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sends a chat request and returns the decoded JSON body of the reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Perform one request/response exchange.
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError>;

    /// Human-readable description of where requests go (for logs).
    fn endpoint(&self) -> &str;
}

/// HTTP transport posting JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for `url`.
    ///
    /// With a timeout, a request that has not completed in time fails like
    /// any other network error. Without one, a hung request stays pending.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(TransportError::from_reqwest)?;

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Logging wrapper for chat transports.
pub struct LoggingTransport {
    inner: Arc<dyn ChatTransport>,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn ChatTransport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ChatTransport for LoggingTransport {
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        let start = Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    "chat request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "chat request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

/// Errors that can occur while talking to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Connection or transfer failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The response body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl TransportError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use crate::config::{ChatConfig, Profile};
    use crate::controller::ConversationController;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    ///
    /// Returns the endpoint URL and a handle resolving to the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then as much body as Content-Length announces.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{addr}/api/chat"), handle)
    }

    /// Accept one connection and never answer it.
    ///
    /// The socket is held open until the client gives up and disconnects.
    async fn accept_and_stall() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            while let Ok(n) = socket.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
        });

        (format!("http://{addr}/api/chat"), handle)
    }

    fn sample_request() -> ChatRequest {
        ChatRequest::new("Be helpful.", &[ChatMessage::user("Hello")])
    }

    #[tokio::test]
    async fn test_http_transport_posts_json() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"reply":"Hi"}"#).await;
        let transport = HttpTransport::new(url, Some(Duration::from_secs(5))).unwrap();

        let body = transport.send(&sample_request()).await.unwrap();
        assert_eq!(body, serde_json::json!({"reply": "Hi"}));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/chat"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(raw.contains(r#"{"role":"system","content":"Be helpful."}"#));
    }

    #[tokio::test]
    async fn test_http_transport_server_error() {
        let (url, _server) = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let transport = HttpTransport::new(url, Some(Duration::from_secs(5))).unwrap();

        let err = transport.send(&sample_request()).await.unwrap_err();
        assert_eq!(err, TransportError::Status(500));
    }

    #[tokio::test]
    async fn test_http_transport_invalid_json() {
        let (url, _server) = serve_once("HTTP/1.1 200 OK", "not json").await;
        let transport = HttpTransport::new(url, Some(Duration::from_secs(5))).unwrap();

        let err = transport.send(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_http_transport_connection_refused() {
        // Bind then drop to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            HttpTransport::new(format!("http://{addr}/api/chat"), Some(Duration::from_secs(5)))
                .unwrap();
        let err = transport.send(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn test_http_transport_times_out_on_silent_server() {
        let (url, _server) = accept_and_stall().await;
        let transport = HttpTransport::new(url, Some(Duration::from_millis(300))).unwrap();

        let err = transport.send(&sample_request()).await.unwrap_err();
        assert_eq!(err, TransportError::Timeout);
    }

    #[tokio::test]
    async fn test_timeout_shows_contact_message() {
        let (url, _server) = accept_and_stall().await;
        let transport = HttpTransport::new(url.clone(), Some(Duration::from_millis(300))).unwrap();
        let config = ChatConfig::for_profile(url, &Profile::default());
        let unreachable = config.unreachable_message.clone();

        let mut controller = ConversationController::new(config, Arc::new(transport));
        controller.open();
        assert!(controller.submit("Are you there?"));
        assert!(controller.is_pending());

        assert!(controller.settle().await);
        assert!(!controller.is_pending());
        assert_eq!(controller.transcript().len(), 3);
        assert_eq!(controller.last_reply(), Some(unreachable.as_str()));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(TransportError::Status(503).to_string(), "HTTP 503");
        assert_eq!(TransportError::Timeout.to_string(), "Request timed out");
    }
}
