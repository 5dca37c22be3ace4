use scratch_core::config::{DEFAULT_API_URL, DEFAULT_APP_NAME};
use scratch_core::{ClientConfig, Result, ScratchError};
use scratch_reveal::RevealConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";
pub const SESSION_DB: &str = "session.db";

/// Settings read from `config.json` in the data directory. Every field is
/// optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub app_name: String,
    /// Scratch card size in pixels.
    pub card_width: u32,
    pub card_height: u32,
    pub reveal: RevealConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            app_name: DEFAULT_APP_NAME.to_string(),
            card_width: 320,
            card_height: 160,
            reveal: RevealConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scratch-win")
    }

    /// Load `config.json` from `data_dir`, or defaults when it is absent.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ScratchError::config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.reveal
            .validate()
            .map_err(|e| ScratchError::config(e.to_string()))?;
        if self.card_width == 0 || self.card_height == 0 {
            return Err(ScratchError::config("card size must be non-zero"));
        }
        self.client(None).validate()
    }

    /// Client settings, with the command-line URL taking precedence.
    pub fn client(&self, api_url: Option<&str>) -> ClientConfig {
        ClientConfig {
            api_url: api_url.unwrap_or(&self.api_url).to_string(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            app_name: self.app_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = CliConfig::load(dir.path()).await.unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.reveal, RevealConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file_and_override() {
        let dir = tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "apiUrl": "https://promo.example.com/", "reveal": { "threshold": 40 } }"#,
        )
        .await
        .unwrap();

        let config = CliConfig::load(dir.path()).await.unwrap();
        assert_eq!(config.reveal.threshold, 40.0);
        assert_eq!(config.reveal.mid_tier, 20.0);
        assert_eq!(config.client(None).base_url(), "https://promo.example.com");
        assert_eq!(
            config.client(Some("http://127.0.0.1:4000")).api_url,
            "http://127.0.0.1:4000"
        );
    }

    #[tokio::test]
    async fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "reveal": { "threshold": 10, "midTier": 20 } }"#,
        )
        .await
        .unwrap();

        assert!(matches!(
            CliConfig::load(dir.path()).await,
            Err(ScratchError::Config(_))
        ));
    }
}
