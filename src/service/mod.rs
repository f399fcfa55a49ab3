//! One queue interface, several ways to reach it
//!
//! The local manager, the HTTP client and the fallback wrapper all implement
//! [`QueueService`], so callers pick a policy once and the queue semantics
//! stay identical whichever store ends up answering.

pub mod fallback;
pub mod remote;

pub use fallback::FallbackQueue;
pub use remote::RemoteQueue;

use crate::queue::{
    QueueError, QueueResult, QueueStats, SharedQueueManager, SubmitTokenRequest, Token,
};
use async_trait::async_trait;

/// Message used when a submission lacks required fields
pub const MISSING_FIELDS: &str = "Missing required: patientName, problem (department)";
/// Message used when a token id is unknown
pub const TOKEN_NOT_FOUND: &str = "Token not found";

#[async_trait]
pub trait QueueService: Send + Sync {
    /// Validate and submit a new token
    async fn submit(&self, request: &SubmitTokenRequest) -> QueueResult<Token>;

    async fn list(&self) -> QueueResult<Vec<Token>>;

    async fn stats(&self) -> QueueResult<QueueStats>;

    async fn call_next(&self) -> QueueResult<Option<Token>>;

    async fn mark_completed(&self) -> QueueResult<Option<Token>>;

    /// Remove a token; unknown ids are [`QueueError::NotFound`]
    async fn remove(&self, id: &str) -> QueueResult<Token>;

    async fn clear(&self) -> QueueResult<()>;

    /// Short label used in logs
    fn name(&self) -> &str;
}

#[async_trait]
impl QueueService for SharedQueueManager {
    async fn submit(&self, request: &SubmitTokenRequest) -> QueueResult<Token> {
        let patient = request
            .validate()
            .ok_or_else(|| QueueError::Validation(MISSING_FIELDS.to_string()))?;
        self.write().await.submit(patient).await
    }

    async fn list(&self) -> QueueResult<Vec<Token>> {
        Ok(self.read().await.list().await)
    }

    async fn stats(&self) -> QueueResult<QueueStats> {
        Ok(self.read().await.stats().await)
    }

    async fn call_next(&self) -> QueueResult<Option<Token>> {
        self.write().await.call_next().await
    }

    async fn mark_completed(&self) -> QueueResult<Option<Token>> {
        self.write().await.mark_completed().await
    }

    async fn remove(&self, id: &str) -> QueueResult<Token> {
        self.write()
            .await
            .remove(id)
            .await?
            .ok_or_else(|| QueueError::NotFound(TOKEN_NOT_FOUND.to_string()))
    }

    async fn clear(&self) -> QueueResult<()> {
        self.write().await.clear().await
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::create_shared_manager;
    use serde_json::json;

    fn request(value: serde_json::Value) -> SubmitTokenRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_local_submit_validates() {
        let queue = create_shared_manager();

        let err = queue
            .submit(&request(json!({ "patientName": "Asha" })))
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::Validation(_)));
        assert!(queue.list().await.unwrap().is_empty());

        let token = queue
            .submit(&request(json!({
                "patientName": "Asha",
                "age": "29",
                "problem": "Dental",
                "priority": "emergency"
            })))
            .await
            .unwrap();
        assert_eq!(token.age, 29);
        assert!(token.priority.is_emergency());
    }

    #[tokio::test]
    async fn test_local_remove_not_found() {
        let queue = create_shared_manager();
        let err = queue.remove("nope").await.unwrap_err();
        assert!(matches!(err, QueueError::NotFound(_)));
        assert_eq!(err.to_string(), TOKEN_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_concurrent_call_next_serves_one() {
        let queue = create_shared_manager();
        for name in ["A", "B", "C", "D"] {
            queue
                .submit(&request(json!({ "patientName": name, "problem": "ENT" })))
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let queue = queue.clone();
            handles.push(tokio::spawn(async move { queue.call_next().await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let serving = queue
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(Token::is_in_progress)
            .count();
        assert!(serving <= 1);
        assert_eq!(queue.stats().await.unwrap().completed_count, 4);
    }
}
