//! Patient queue: tokens, priority ordering and derived statistics
//!
//! This module provides:
//! - The token model and submission normalization
//! - Pure queue state transitions (submit, call-next, complete, remove, clear)
//! - A manager applying those transitions over an injected store
//! - Memory and file-backed storage adapters

pub mod manager;
pub mod state;
pub mod storage;
pub mod token;

pub use manager::QueueManager;
pub use state::{QueueState, QueueStats};
pub use storage::{FileStore, MemoryStore, StoreError, TokenStore};
pub use token::{NewToken, Priority, SubmitTokenRequest, Token, TokenStatus};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// Shared queue manager instance. Every operation runs under the write guard
/// so no two requests can interleave a load-modify-save sequence.
pub type SharedQueueManager = Arc<RwLock<QueueManager>>;

/// Create a shared manager over process memory
pub fn create_shared_manager() -> SharedQueueManager {
    Arc::new(RwLock::new(QueueManager::default()))
}

/// Wrap an existing manager for sharing
pub fn share(manager: QueueManager) -> SharedQueueManager {
    Arc::new(RwLock::new(manager))
}
