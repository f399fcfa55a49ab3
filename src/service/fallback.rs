//! Remote-first queue access with a local fallback

use super::QueueService;
use crate::queue::{QueueError, QueueResult, QueueStats, SubmitTokenRequest, Token};
use async_trait::async_trait;
use tracing::warn;

/// Runs each operation on `primary`; when that fails with a transport error
/// the same operation is replayed on `fallback`.
///
/// Validation and not-found answers from the primary are returned as is.
/// Apart from `clear`, which empties both, the two stores are never
/// reconciled, so they can drift apart while the primary is unreachable.
pub struct FallbackQueue<P, F> {
    primary: P,
    fallback: F,
}

macro_rules! with_fallback {
    ($self:ident, $op:literal, $($call:tt)+) => {
        match $self.primary.$($call)+.await {
            Err(QueueError::Transport(reason)) => {
                warn!(
                    "{} unavailable for {} ({}), using {} queue",
                    $self.primary.name(),
                    $op,
                    reason,
                    $self.fallback.name()
                );
                $self.fallback.$($call)+.await
            }
            other => other,
        }
    };
}

impl<P: QueueService, F: QueueService> FallbackQueue<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

#[async_trait]
impl<P: QueueService, F: QueueService> QueueService for FallbackQueue<P, F> {
    async fn submit(&self, request: &SubmitTokenRequest) -> QueueResult<Token> {
        with_fallback!(self, "submit", submit(request))
    }

    async fn list(&self) -> QueueResult<Vec<Token>> {
        with_fallback!(self, "list", list())
    }

    async fn stats(&self) -> QueueResult<QueueStats> {
        with_fallback!(self, "stats", stats())
    }

    async fn call_next(&self) -> QueueResult<Option<Token>> {
        with_fallback!(self, "call-next", call_next())
    }

    async fn mark_completed(&self) -> QueueResult<Option<Token>> {
        with_fallback!(self, "mark-completed", mark_completed())
    }

    async fn remove(&self, id: &str) -> QueueResult<Token> {
        with_fallback!(self, "remove", remove(id))
    }

    async fn clear(&self) -> QueueResult<()> {
        with_fallback!(self, "clear", clear())?;

        // A clear always empties the fallback as well
        if let Err(e) = self.fallback.clear().await {
            warn!("Failed to clear {} queue: {}", self.fallback.name(), e);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
