pub mod admin;
pub mod cli;
pub mod config;
pub mod directory;
pub mod queue;
pub mod service;
pub mod web_server;

// Public API
pub use config::Config;
pub use directory::{Directory, SharedDirectory};
pub use queue::{
    create_shared_manager, share, FileStore, MemoryStore, Priority, QueueError, QueueManager,
    QueueResult, QueueState, QueueStats, SharedQueueManager, SubmitTokenRequest, Token,
    TokenStatus, TokenStore,
};
pub use service::{FallbackQueue, QueueService, RemoteQueue};
pub use web_server::{create_router, AppState, WebServer};
