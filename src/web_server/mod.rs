pub mod admin;
pub mod directory;
pub mod envelope;
pub mod server;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use envelope::{ApiError, ApiResponse};
pub use server::{create_router, WebServer};

use crate::config::AdminConfig;
use crate::directory::SharedDirectory;
use crate::queue::SharedQueueManager;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub queue: SharedQueueManager,
    pub directory: SharedDirectory,
    pub admin: AdminConfig,
}

impl AppState {
    pub fn new(queue: SharedQueueManager, directory: SharedDirectory, admin: AdminConfig) -> Self {
        Self {
            queue,
            directory,
            admin,
        }
    }
}
