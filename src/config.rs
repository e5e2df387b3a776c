use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub documents: DocumentsConfig,
    pub meetings: MeetingsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub default_service: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    pub data_file: String,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MeetingsConfig {
    pub data_file: String,
    #[serde(default = "default_business_hours")]
    pub business_hours: Vec<u32>,
    #[serde(default = "default_search_days")]
    pub search_days: u32,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_max_limit() -> usize {
    50
}

fn default_max_batch_size() -> usize {
    20
}

fn default_business_hours() -> Vec<u32> {
    vec![9, 10, 11, 14, 15, 16]
}

fn default_search_days() -> u32 {
    7
}

fn default_max_suggestions() -> usize {
    3
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read config file {}. Make sure it exists.", path.display())
        })?;

        let mut config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        // Override data locations with environment variables if set
        if let Ok(file) = std::env::var("DOCUMENTS_DATA_FILE") {
            config.documents.data_file = file;
        }
        if let Ok(file) = std::env::var("MEETINGS_DATA_FILE") {
            config.meetings.data_file = file;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(hour) = self.meetings.business_hours.iter().find(|h| **h > 23) {
            anyhow::bail!("Invalid business hour in config: {}", hour);
        }
        if self.documents.max_limit == 0 || self.documents.max_batch_size == 0 {
            anyhow::bail!("Document limits must be greater than zero");
        }
        Ok(())
    }

    /// Create parent directories of the data files if they don't exist
    pub fn ensure_directories(&self) -> Result<()> {
        for file in [&self.documents.data_file, &self.meetings.data_file] {
            if let Some(parent) = Path::new(file).parent() {
                if parent.as_os_str().is_empty() {
                    continue;
                }
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory for {}", file))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
            [server]
            name = "assistant-tools"
            default_service = "meetings"

            [documents]
            data_file = "./data/documents.json"

            [meetings]
            data_file = "./data/meetings.json"
            business_hours = [8, 13]

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.default_service, "meetings");
        assert_eq!(config.documents.max_limit, 50);
        assert_eq!(config.documents.max_batch_size, 20);
        assert_eq!(config.meetings.business_hours, vec![8, 13]);
        assert_eq!(config.meetings.search_days, 7);
        assert_eq!(config.meetings.max_suggestions, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_business_hour_rejected() {
        let toml_str = r#"
            [server]
            name = "x"
            default_service = "documents"

            [documents]
            data_file = "d.json"

            [meetings]
            data_file = "m.json"
            business_hours = [9, 24]

            [logging]
            level = "info"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_err());
    }

    fn write_config(dir: &tempfile::TempDir, documents: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        let content = format!(
            r#"
            [server]
            name = "assistant-tools"
            default_service = "documents"

            [documents]
            {documents}

            [meetings]
            data_file = "./data/meetings.json"

            [logging]
            level = "info"
            "#
        );
        fs::write(&path, content).unwrap();
        path
    }

    // Every from_file call lives here so the env overrides never leak into
    // another test.
    #[test]
    fn test_from_file_with_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"data_file = "./data/documents.json""#);

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.documents.data_file, "./data/documents.json");
        assert_eq!(config.meetings.data_file, "./data/meetings.json");
        assert_eq!(config.meetings.business_hours, vec![9, 10, 11, 14, 15, 16]);

        std::env::set_var("DOCUMENTS_DATA_FILE", "/tmp/override/documents.json");
        std::env::set_var("MEETINGS_DATA_FILE", "/tmp/override/meetings.json");
        let overridden = Config::from_file(&path);
        std::env::remove_var("DOCUMENTS_DATA_FILE");
        std::env::remove_var("MEETINGS_DATA_FILE");

        let overridden = overridden.unwrap();
        assert_eq!(overridden.documents.data_file, "/tmp/override/documents.json");
        assert_eq!(overridden.meetings.data_file, "/tmp/override/meetings.json");

        let zero = write_config(&dir, "data_file = \"d.json\"\n            max_limit = 0");
        let err = Config::from_file(&zero).unwrap_err();
        assert_eq!(err.to_string(), "Document limits must be greater than zero");

        let err = Config::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }

    #[test]
    fn test_ensure_directories_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let mut config: Config = toml::from_str(
            r#"
            [server]
            name = "x"
            default_service = "documents"

            [documents]
            data_file = "d.json"

            [meetings]
            data_file = "m.json"

            [logging]
            level = "info"
            "#,
        )
        .unwrap();
        let documents = dir.path().join("a").join("b").join("documents.json");
        let meetings = dir.path().join("c").join("meetings.json");
        config.documents.data_file = documents.display().to_string();
        config.meetings.data_file = meetings.display().to_string();

        config.ensure_directories().unwrap();
        assert!(documents.parent().unwrap().is_dir());
        assert!(meetings.parent().unwrap().is_dir());
        assert!(!documents.exists());

        // Bare file names need no directory
        config.documents.data_file = "documents.json".to_string();
        config.ensure_directories().unwrap();
    }
}
