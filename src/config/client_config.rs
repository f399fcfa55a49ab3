use crate::queue::{share, FileStore, QueueManager, QueueResult, SharedQueueManager};
use crate::service::{FallbackQueue, RemoteQueue};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the operator console talking to a server
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            cache_dir: default_cache_dir(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Local queue over the offline cache directory
    pub fn local_queue(&self) -> SharedQueueManager {
        share(QueueManager::new(Box::new(FileStore::new(
            &self.cache_dir,
            self.seed_demo_data,
        ))))
    }

    /// Server first, offline cache when the server cannot be reached
    pub fn create_queue(&self) -> QueueResult<FallbackQueue<RemoteQueue, SharedQueueManager>> {
        let remote = RemoteQueue::new(&self.base_url, self.timeout())?;
        Ok(FallbackQueue::new(remote, self.local_queue()))
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("clinicq"))
        .unwrap_or_else(|| PathBuf::from(".clinicq-cache"))
}

fn default_seed_demo_data() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.seed_demo_data);
        assert!(config.cache_dir.ends_with("clinicq") || config.cache_dir.ends_with(".clinicq-cache"));
    }

    #[test]
    fn test_client_config_deserialization() {
        let yaml = r#"
base_url: "http://queue.local:9000/api"
timeout_ms: 250
cache_dir: /tmp/clinicq-cache
seed_demo_data: false
"#;
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://queue.local:9000/api");
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/clinicq-cache"));
        assert!(!config.seed_demo_data);
    }
}
