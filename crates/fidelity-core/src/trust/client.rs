//! HTTP client for the trust calculation service.

use async_trait::async_trait;
use std::time::Duration;

use super::retry::{backoff_duration, is_retryable};
use super::{TrustRequest, TrustResponse, TrustService};
use crate::config::TrustConfig;
use crate::error::TrustError;

/// Talks to the trust service over `POST {endpoint}/compute-trust`.
pub struct HttpTrustClient {
    endpoint: String,
    client: reqwest::Client,
    timeout_ms: u64,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl HttpTrustClient {
    pub fn new(config: &TrustConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout_ms: config.timeout_ms,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One request, no retries.
    async fn send_once(&self, request: &TrustRequest) -> Result<TrustResponse, TrustError> {
        let url = format!("{}/compute-trust", self.endpoint);
        let resp = self
            .client
            .post(&url)
            .json(request)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TrustError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else if e.is_connect() {
                    TrustError::Http {
                        message: format!("Cannot connect to {url}: {e}"),
                        status_code: None,
                    }
                } else {
                    TrustError::Http {
                        message: format!("Request to {url} failed: {e}"),
                        status_code: None,
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(TrustError::Http {
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        resp.json::<TrustResponse>()
            .await
            .map_err(|e| TrustError::InvalidResponse(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl TrustService for HttpTrustClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn compute_trust(&self, request: &TrustRequest) -> Result<TrustResponse, TrustError> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Ok(response) => {
                    if response.identity_id != request.identity_id {
                        tracing::warn!(
                            "Trust service answered for {:?}, requested {:?}",
                            response.identity_id,
                            request.identity_id
                        );
                    }
                    tracing::debug!(
                        "Trust score for {}: {:.3}",
                        response.identity_id,
                        response.trust_score
                    );
                    return Ok(response);
                }
                Err(e) if attempt < self.retry_attempts && is_retryable(&e) => {
                    let delay = backoff_duration(attempt, self.retry_delay_ms);
                    tracing::warn!(
                        "Trust request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempt + 1,
                        self.retry_attempts + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    /// Read one HTTP request (headers plus Content-Length body) and return the body.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return String::from_utf8_lossy(&buf[end + 4..end + 4 + content_length])
                        .to_string();
                }
            }
        }
        String::new()
    }

    /// Serve the canned `(status line, body)` responses, one per connection,
    /// forwarding each request body on the returned channel.
    async fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request_body = read_request(&mut stream).await;
                let _ = tx.send(request_body);
                let reply = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });
        (format!("http://{addr}"), rx)
    }

    fn client(endpoint: String, retry_attempts: u32) -> HttpTrustClient {
        HttpTrustClient::new(&TrustConfig {
            endpoint,
            timeout_ms: 5_000,
            retry_attempts,
            retry_delay_ms: 1,
            ..TrustConfig::default()
        })
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = client("http://localhost:8001/".to_string(), 0);
        assert_eq!(client.endpoint(), "http://localhost:8001");
        assert_eq!(client.name(), "http");
    }

    #[tokio::test]
    async fn test_compute_trust_round_trip() {
        let (endpoint, mut bodies) = serve(vec![(
            "200 OK",
            r#"{"identity_id":"alice","trust_score":0.87,"entropy":0.05,"updated_at":1700000000.0}"#,
        )])
        .await;

        let request = TrustRequest::new("alice", 0.95, 0.6, 0.9).unwrap();
        let response = client(endpoint, 0).compute_trust(&request).await.unwrap();
        assert_eq!(response.identity_id, "alice");
        assert_eq!(response.trust_score, 0.87);
        assert!(response.tx_hash.is_none());

        let sent: serde_json::Value = serde_json::from_str(&bodies.recv().await.unwrap()).unwrap();
        assert_eq!(sent["identity_id"], "alice");
        assert_eq!(sent["biometric_fidelity"], 0.6);
        assert_eq!(sent["agreement_rate"], 0.95);
        assert_eq!(sent["witness_score"], 0.9);
    }

    #[tokio::test]
    async fn test_retries_server_error_then_succeeds() {
        let (endpoint, _bodies) = serve(vec![
            ("503 Service Unavailable", r#"{"detail":"busy"}"#),
            ("200 OK", r#"{"identity_id":"bob","trust_score":0.5}"#),
        ])
        .await;

        let request = TrustRequest::new("bob", 0.9, 0.4, 0.9).unwrap();
        let response = client(endpoint, 2).compute_trust(&request).await.unwrap();
        assert_eq!(response.trust_score, 0.5);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let (endpoint, _bodies) = serve(vec![(
            "422 Unprocessable Entity",
            r#"{"detail":"bad values"}"#,
        )])
        .await;

        let request = TrustRequest::new("carol", 0.9, 0.4, 0.9).unwrap();
        let err = client(endpoint, 3).compute_trust(&request).await.unwrap_err();
        assert!(matches!(
            err,
            TrustError::Http {
                status_code: Some(422),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let (endpoint, _bodies) = serve(vec![("200 OK", r#"{"unexpected":true}"#)]).await;

        let request = TrustRequest::new("dave", 0.9, 0.4, 0.9).unwrap();
        let err = client(endpoint, 0).compute_trust(&request).await.unwrap_err();
        assert!(matches!(err, TrustError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_retryable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = TrustRequest::new("erin", 0.9, 0.4, 0.9).unwrap();
        let err = client(format!("http://{addr}"), 1)
            .compute_trust(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, TrustError::Http { status_code: None, .. }));
        assert!(err.to_string().contains("connect"), "{err}");
        assert!(is_retryable(&err));
    }
}
