//! Queue manager: the single mutator of queue state

use super::state::{QueueState, QueueStats, DEFAULT_MINUTES_PER_PATIENT};
use super::storage::{MemoryStore, TokenStore};
use super::token::{NewToken, Token};
use super::QueueResult;
use tracing::{debug, info};

/// Applies queue operations to state held by an injected store.
///
/// Each operation loads the state, applies one transition and writes it
/// back, so callers must serialize access (see [`super::SharedQueueManager`]).
pub struct QueueManager {
    store: Box<dyn TokenStore>,
    minutes_per_patient: u32,
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("store", &self.store.name())
            .field("minutes_per_patient", &self.minutes_per_patient)
            .finish()
    }
}

impl QueueManager {
    /// Create a queue manager over the given store
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            minutes_per_patient: DEFAULT_MINUTES_PER_PATIENT,
        }
    }

    /// Override the per-patient service time used for wait estimates
    pub fn with_minutes_per_patient(mut self, minutes: u32) -> Self {
        self.minutes_per_patient = minutes;
        self
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Issue a new waiting token
    pub async fn submit(&mut self, patient: NewToken) -> QueueResult<Token> {
        let mut state = self.store.load().await;
        let token = state.submit(patient);
        self.store.save(&state).await?;

        info!(
            "Issued token {} for {} ({})",
            token.token_number,
            token.problem,
            token.priority.as_str()
        );
        Ok(token)
    }

    /// Tokens in creation order
    pub async fn list(&self) -> Vec<Token> {
        self.store.load().await.tokens
    }

    /// Complete the serving token and promote the next waiting one
    pub async fn call_next(&mut self) -> QueueResult<Option<Token>> {
        let mut state = self.store.load().await;
        let next = state.call_next();
        self.store.save(&state).await?;

        match &next {
            Some(token) => info!("Now serving token {}", token.token_number),
            None => debug!("No waiting tokens to call"),
        }
        Ok(next)
    }

    /// Complete the serving token, if any
    pub async fn mark_completed(&mut self) -> QueueResult<Option<Token>> {
        let mut state = self.store.load().await;
        let completed = state.mark_completed();
        if completed.is_some() {
            self.store.save(&state).await?;
        }

        if let Some(token) = &completed {
            info!("Completed token {}", token.token_number);
        }
        Ok(completed)
    }

    /// Remove a token by id, whatever its status
    pub async fn remove(&mut self, id: &str) -> QueueResult<Option<Token>> {
        let mut state = self.store.load().await;
        let removed = state.remove_by_id(id);
        if removed.is_some() {
            self.store.save(&state).await?;
        }

        match &removed {
            Some(token) => info!("Removed token {} from queue", token.token_number),
            None => debug!("Token not found for removal: {}", id),
        }
        Ok(removed)
    }

    /// Drop every token and reset the issuance counter
    pub async fn clear(&mut self) -> QueueResult<()> {
        let mut state = self.store.load().await;
        state.clear();
        self.store.save(&state).await?;

        info!("Queue cleared");
        Ok(())
    }

    pub async fn stats(&self) -> QueueStats {
        self.store.load().await.stats(self.minutes_per_patient)
    }

    /// Raw state snapshot
    pub async fn snapshot(&self) -> QueueState {
        self.store.load().await
    }
}
