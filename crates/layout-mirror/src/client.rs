//! HTTP client for the remote layout mirror.
//!
//! The mirror is a write-only endpoint accepting the same JSON body that is
//! stored locally. This module sends it and maps the response status to
//! [`MirrorError`].

use crate::error::MirrorError;
use std::time::Duration;

/// Default request timeout for a mirror push.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client bound to one mirror endpoint.
///
/// Cloning is cheap; clones share the underlying connection pool, so a clone
/// can be moved into a spawned task for each push.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    client: reqwest::Client,
    endpoint: String,
}

impl MirrorClient {
    /// Create a client for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Client`] if the HTTP client cannot be built
    /// (for example when the TLS backend fails to initialize).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, MirrorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MirrorError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a JSON snapshot body to the mirror.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if:
    /// - the request fails or times out
    /// - the server returns 429 (rate limited)
    /// - the server returns 4xx or 5xx
    pub async fn push(&self, body: String) -> Result<(), MirrorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MirrorError::Timeout
                } else {
                    MirrorError::Network(e.to_string())
                }
            })?;

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        map_status(response.status().as_u16(), retry_after)
    }
}

/// Map an HTTP status to a push result.
pub fn map_status(status: u16, retry_after: Option<String>) -> Result<(), MirrorError> {
    match status {
        200..=299 => Ok(()),
        429 => Err(MirrorError::RateLimited { retry_after }),
        400..=499 => Err(MirrorError::Rejected(status)),
        500..=599 => Err(MirrorError::Server(status)),
        _ => Err(MirrorError::Unexpected(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_map_status_success_range() {
        assert!(map_status(200, None).is_ok());
        assert!(map_status(201, None).is_ok());
        assert!(map_status(204, None).is_ok());
    }

    #[test]
    fn test_map_status_errors() {
        assert!(matches!(
            map_status(429, Some("10".to_string())),
            Err(MirrorError::RateLimited { retry_after: Some(r) }) if r == "10"
        ));
        assert!(matches!(map_status(404, None), Err(MirrorError::Rejected(404))));
        assert!(matches!(map_status(503, None), Err(MirrorError::Server(503))));
        assert!(matches!(map_status(302, None), Err(MirrorError::Unexpected(302))));
    }

    /// Read one HTTP request (headers plus Content-Length body) from a socket.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read failed");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve one request with a fixed status line, returning the raw request.
    async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept failed");
            let request = read_request(&mut socket).await;
            let response =
                format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write failed");
            request
        });
        (format!("http://{addr}/api/save-layout"), handle)
    }

    #[tokio::test]
    async fn test_push_posts_json_body() {
        let (url, server) = serve_once("200 OK").await;
        let client = MirrorClient::new(url, DEFAULT_TIMEOUT).expect("client should build");

        let body = r#"{"layout":{"rows":1,"cols":1},"widgets":[null]}"#.to_string();
        client.push(body.clone()).await.expect("push should succeed");

        let request = server.await.expect("server task panicked");
        assert!(request.starts_with("POST /api/save-layout"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(&body));
    }

    #[tokio::test]
    async fn test_push_maps_server_error() {
        let (url, server) = serve_once("500 Internal Server Error").await;
        let client = MirrorClient::new(url, DEFAULT_TIMEOUT).expect("client should build");

        let err = client
            .push("{}".to_string())
            .await
            .expect_err("500 should fail");
        assert!(matches!(err, MirrorError::Server(500)));
        server.await.expect("server task panicked");
    }

    #[tokio::test]
    async fn test_push_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");
        drop(listener);

        let client = MirrorClient::new(format!("http://{addr}/"), DEFAULT_TIMEOUT)
            .expect("client should build");
        let err = client
            .push("{}".to_string())
            .await
            .expect_err("closed port should fail");
        assert!(matches!(err, MirrorError::Network(_)), "got {err:?}");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_push_times_out_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.expect("accept failed");
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = MirrorClient::new(format!("http://{addr}/"), Duration::from_millis(100))
            .expect("client should build");
        let err = client
            .push("{}".to_string())
            .await
            .expect_err("silent server should time out");
        assert!(matches!(err, MirrorError::Timeout), "got {err:?}");
    }

    #[test]
    fn test_endpoint_accessor() {
        let client = MirrorClient::new("http://localhost:3000/api/save-layout", DEFAULT_TIMEOUT)
            .expect("client should build");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/save-layout");
    }
}
