use crate::queue::state::DEFAULT_MINUTES_PER_PATIENT;
use crate::queue::{FileStore, MemoryStore, QueueManager, TokenStore};
use serde::Deserialize;
use std::path::PathBuf;

/// Where the server keeps queue state
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub seed_demo_data: bool,
    #[serde(default = "default_minutes_per_patient")]
    pub minutes_per_patient: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            data_dir: default_data_dir(),
            seed_demo_data: false,
            minutes_per_patient: default_minutes_per_patient(),
        }
    }
}

impl QueueConfig {
    /// Build the queue manager this configuration describes
    pub fn create_manager(&self) -> QueueManager {
        let store: Box<dyn TokenStore> = match self.storage {
            StorageKind::Memory => Box::new(MemoryStore::new()),
            StorageKind::File => Box::new(FileStore::new(&self.data_dir, self.seed_demo_data)),
        };
        QueueManager::new(store).with_minutes_per_patient(self.minutes_per_patient)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".clinicq")
}

fn default_minutes_per_patient() -> u32 {
    DEFAULT_MINUTES_PER_PATIENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queue_config() {
        let config = QueueConfig::default();
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.minutes_per_patient, 5);
        assert!(!config.seed_demo_data);
        assert_eq!(config.create_manager().store_name(), "memory");
    }

    #[test]
    fn test_queue_config_deserialization() {
        let yaml = r#"
storage: file
data_dir: /tmp/clinicq
minutes_per_patient: 8
"#;
        let config: QueueConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/clinicq"));
        assert_eq!(config.minutes_per_patient, 8);
        assert_eq!(config.create_manager().store_name(), "file");
    }

    #[test]
    fn test_unknown_storage_kind_rejected() {
        let result: Result<QueueConfig, _> = serde_yaml::from_str("storage: redis");
        assert!(result.is_err());
    }
}
