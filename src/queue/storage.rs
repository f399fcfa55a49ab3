//! Storage adapters for queue state
//!
//! `MemoryStore` backs the server-hosted queue. `FileStore` is the durable
//! client-side cache: a directory holding two named entries, the serialized
//! token list and the next-issuance counter as a decimal string.

use super::state::{QueueState, INITIAL_COUNTER};
use super::token::{format_token_number, Priority, Token, TokenStatus};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

/// Entry holding the serialized token list
pub const TOKENS_ENTRY: &str = "clinic_queue_tokens";
/// Entry holding the next-issuance counter
pub const COUNTER_ENTRY: &str = "clinic_queue_counter";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Backing storage for a [`super::QueueManager`].
///
/// `load` never fails: an unavailable or unreadable store degrades to the
/// adapter's initial state.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> QueueState;

    async fn save(&mut self, state: &QueueState) -> StoreResult<()>;

    fn name(&self) -> &'static str;
}

/// Process-memory storage; starts empty
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: QueueState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn load(&self) -> QueueState {
        self.state.clone()
    }

    async fn save(&mut self, state: &QueueState) -> StoreResult<()> {
        self.state = state.clone();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Durable key-value cache in a local directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    seed_demo_data: bool,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P, seed_demo_data: bool) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            seed_demo_data,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, entry: &str) -> PathBuf {
        self.dir.join(entry)
    }

    /// Read a named entry. Missing or unreadable entries are `None`.
    async fn read_entry(&self, entry: &str) -> Option<String> {
        let path = self.entry_path(entry);
        match fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Queue cache entry not found: {}", path.display());
                None
            }
            Err(e) => {
                warn!("Queue cache entry unreadable {}: {}", path.display(), e);
                None
            }
        }
    }

    fn initial_tokens(&self) -> Vec<Token> {
        if self.seed_demo_data {
            info!("Starting queue cache from demo patients: {}", self.dir.display());
            seed_tokens()
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn load(&self) -> QueueState {
        let tokens = match self.read_entry(TOKENS_ENTRY).await {
            Some(content) => match serde_json::from_str::<Vec<Token>>(&content) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!("Queue cache is corrupted, using built-in data: {}", e);
                    self.initial_tokens()
                }
            },
            None => self.initial_tokens(),
        };

        let derived = QueueState::from_tokens(tokens);
        let stored = self
            .read_entry(COUNTER_ENTRY)
            .await
            .and_then(|content| match content.trim().parse::<u32>() {
                Ok(n) if n >= INITIAL_COUNTER => Some(n),
                _ => {
                    warn!("Queue counter entry is invalid: {:?}", content);
                    None
                }
            });

        // Never issue a number at or below one already on disk
        let next_number = match stored {
            Some(n) if n < derived.next_number => {
                warn!(
                    "Queue counter {} is behind stored tokens, using {}",
                    n, derived.next_number
                );
                derived.next_number
            }
            Some(n) => n,
            None => derived.next_number,
        };

        QueueState {
            tokens: derived.tokens,
            next_number,
        }
    }

    async fn save(&mut self, state: &QueueState) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).await?;

        // Counter first, so an interrupted save leaves it ahead of the tokens
        let json = serde_json::to_string_pretty(&state.tokens)?;
        fs::write(self.entry_path(COUNTER_ENTRY), state.next_number.to_string()).await?;
        fs::write(self.entry_path(TOKENS_ENTRY), json).await?;

        debug!(
            "Saved {} tokens to queue cache: {}",
            state.tokens.len(),
            self.dir.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Demo patients shown by a client cache that has never been written
pub fn seed_tokens() -> Vec<Token> {
    let seed = [
        ("1", 1, "Rahul Sharma", 35, "Male", "General Checkup", TokenStatus::Completed, Priority::Normal, 0),
        ("2", 2, "Priya Patel", 28, "Female", "Dental", TokenStatus::InProgress, Priority::Normal, 15),
        ("3", 3, "Amit Kumar", 45, "Male", "Orthopedic", TokenStatus::Waiting, Priority::Emergency, 30),
        ("4", 4, "Sneha Reddy", 32, "Female", "ENT", TokenStatus::Waiting, Priority::Normal, 45),
    ];

    seed.into_iter()
        .map(
            |(id, number, name, age, gender, problem, status, priority, minute)| Token {
                id: id.to_string(),
                token_number: format_token_number(number),
                patient_name: name.to_string(),
                age,
                gender: gender.to_string(),
                problem: problem.to_string(),
                priority,
                status,
                created_at: Utc
                    .with_ymd_and_hms(2025, 2, 1, 9, minute, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
            },
        )
        .collect()
}
