pub mod admin_config;
pub mod client_config;
pub mod queue_config;
pub mod server_config;

pub use admin_config::AdminConfig;
pub use client_config::ClientConfig;
pub use queue_config::{QueueConfig, StorageKind};
pub use server_config::ServerConfig;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure matching config.yaml format
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Load configuration from YAML file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML config file")?;

        Ok(config)
    }

    /// Load the file if it exists. `None` means the caller should use defaults.
    pub fn load(config_path: &Path) -> Result<Option<Self>> {
        if config_path.exists() {
            Self::from_file(config_path).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_from_file() -> Result<()> {
        let yaml_content = r#"
server:
  port: 7000
queue:
  storage: file
  seed_demo_data: true
admin:
  password: s3cret
"#;
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", yaml_content)?;

        let config = Config::from_file(temp_file.path())?;
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.queue.storage, StorageKind::File);
        assert!(config.queue.seed_demo_data);
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.admin.password, "s3cret");
        assert_eq!(config.client.timeout_ms, 3000);
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "server: [unclosed").unwrap();

        let result = Config::from_file(temp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = Config::load(Path::new("does-not-exist.yaml")).unwrap();
        assert!(loaded.is_none());

        let config = loaded.unwrap_or_default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.queue.storage, StorageKind::Memory);
    }

    #[test]
    fn test_load_existing_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "server:\n  port: 6100\n")?;

        let config = Config::load(temp_file.path())?.expect("file exists");
        assert_eq!(config.server.port, 6100);
        Ok(())
    }

    #[test]
    fn test_file_not_found() {
        let result = Config::from_file(Path::new("does-not-exist.yaml"));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }
}
