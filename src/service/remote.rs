//! HTTP client for a server-hosted queue

use super::QueueService;
use crate::queue::{QueueError, QueueResult, QueueStats, SubmitTokenRequest, Token};
use crate::web_server::envelope::ApiResponse;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Talks to `/tokens` endpoints of a running server.
///
/// Connection failures, timeouts, unexpected statuses and unreadable bodies
/// are all reported as [`QueueError::Transport`]. A 400 or 404 carrying the
/// error envelope is a real answer and maps to validation / not-found.
#[derive(Debug, Clone)]
pub struct RemoteQueue {
    base_url: String,
    http: Client,
}

impl RemoteQueue {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`
    pub fn new(base_url: &str, timeout: Duration) -> QueueResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> QueueResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| QueueError::Transport(format!("invalid URL {}: {}", raw, e)))
    }

    /// `/tokens/{id}` with the id as a single encoded path segment
    fn token_url(&self, id: &str) -> QueueResult<Url> {
        let mut url = self.url("/tokens")?;
        url.path_segments_mut()
            .map_err(|_| QueueError::Transport(format!("{} cannot take a path", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&SubmitTokenRequest>,
    ) -> QueueResult<ApiResponse<T>> {
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QueueError::Transport(format!("{}: {}", url, e)))?;
        let status = response.status();

        match status {
            s if s.is_success() => response
                .json::<ApiResponse<T>>()
                .await
                .map_err(|e| QueueError::Transport(format!("invalid response from {}: {}", url, e))),
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                let message = response
                    .json::<ApiResponse<serde_json::Value>>()
                    .await
                    .ok()
                    .and_then(|envelope| envelope.message)
                    .ok_or_else(|| QueueError::Transport(format!("{} returned {}", url, status)))?;

                if status == StatusCode::BAD_REQUEST {
                    Err(QueueError::Validation(message))
                } else {
                    Err(QueueError::NotFound(message))
                }
            }
            _ => Err(QueueError::Transport(format!("{} returned {}", url, status))),
        }
    }

    fn require<T>(envelope: ApiResponse<T>, what: &str) -> QueueResult<T> {
        envelope
            .data
            .ok_or_else(|| QueueError::Transport(format!("response is missing {}", what)))
    }
}

#[async_trait]
impl QueueService for RemoteQueue {
    async fn submit(&self, request: &SubmitTokenRequest) -> QueueResult<Token> {
        let envelope = self
            .send(Method::POST, self.url("/tokens")?, Some(request))
            .await?;
        Self::require(envelope, "token")
    }

    async fn list(&self) -> QueueResult<Vec<Token>> {
        let envelope = self.send(Method::GET, self.url("/tokens")?, None).await?;
        Self::require(envelope, "tokens")
    }

    async fn stats(&self) -> QueueResult<QueueStats> {
        let envelope = self.send(Method::GET, self.url("/tokens/stats")?, None).await?;
        Self::require(envelope, "stats")
    }

    async fn call_next(&self) -> QueueResult<Option<Token>> {
        let envelope = self.send(Method::POST, self.url("/tokens/call-next")?, None).await?;
        Ok(envelope.data)
    }

    async fn mark_completed(&self) -> QueueResult<Option<Token>> {
        let envelope = self
            .send(Method::POST, self.url("/tokens/mark-completed")?, None)
            .await?;
        Ok(envelope.data)
    }

    async fn remove(&self, id: &str) -> QueueResult<Token> {
        let envelope = self
            .send(Method::DELETE, self.token_url(id)?, None)
            .await?;
        Self::require(envelope, "token")
    }

    async fn clear(&self) -> QueueResult<()> {
        self.send::<Vec<Token>>(Method::DELETE, self.url("/tokens")?, None)
            .await
            .map(|_| ())
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let remote = RemoteQueue::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(remote.base_url(), "http://localhost:5000/api");
        assert_eq!(
            remote.url("/tokens").unwrap().as_str(),
            "http://localhost:5000/api/tokens"
        );
    }

    #[test]
    fn test_token_id_is_one_encoded_segment() {
        let remote = RemoteQueue::new("http://localhost:5000/api", Duration::from_secs(1)).unwrap();
        let url = remote.token_url("a/b?c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/tokens/a%2Fb%3Fc");
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_missing_list_data_is_rejected() {
        let envelope: ApiResponse<Vec<Token>> =
            serde_json::from_str(r#"{"success": true, "data": null}"#).unwrap();
        let err = RemoteQueue::require(envelope, "tokens").unwrap_err();
        assert!(matches!(err, QueueError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on loopback is not expected to run an HTTP server
        let remote = RemoteQueue::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        let err = remote.list().await.unwrap_err();
        assert!(matches!(err, QueueError::Transport(_)));
    }
}
