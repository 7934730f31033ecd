use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Caption fetch settings
    pub fetch: FetchConfig,

    /// Punctuation restoration settings
    pub restore: RestoreConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum fetch attempts for transient failures
    pub max_attempts: u32,

    /// Base delay between attempts in milliseconds (doubles per attempt)
    pub base_backoff_ms: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreConfig {
    /// Punctuation model endpoint; restoration degrades to raw text when unset
    pub endpoint: Option<String>,

    /// Optional bearer token for the model endpoint
    pub api_token: Option<String>,

    /// Maximum characters sent to the model in one request
    pub max_chunk_chars: usize,

    /// Per-request timeout in seconds (model inference can be slow)
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default caption language
    pub default_language: String,

    /// Default directory transcripts are published into
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig {
                max_attempts: 3,
                base_backoff_ms: 500,
                request_timeout_secs: 20,
            },
            restore: RestoreConfig {
                endpoint: None,
                api_token: None,
                max_chunk_chars: 2000,
                request_timeout_secs: 60,
            },
            app: AppConfig {
                default_language: "en".to_string(),
                output_dir: PathBuf::from("."),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("caption-scribe").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.fetch.max_attempts == 0 {
            anyhow::bail!("fetch.max_attempts must be at least 1");
        }

        if self.restore.max_chunk_chars == 0 {
            anyhow::bail!("restore.max_chunk_chars must be at least 1");
        }

        if let Some(endpoint) = &self.restore.endpoint {
            url::Url::parse(endpoint)
                .with_context(|| format!("restore.endpoint is not a valid URL: {}", endpoint))?;
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Fetch attempts: {}", self.fetch.max_attempts);
        println!("  Fetch backoff: {}ms", self.fetch.base_backoff_ms);
        match &self.restore.endpoint {
            Some(endpoint) => println!("  Punctuation endpoint: {}", endpoint),
            None => println!("  Punctuation endpoint: (not configured)"),
        }
        println!("  Model chunk size: {} chars", self.restore.max_chunk_chars);
        println!("  Default language: {}", self.app.default_language);
        println!("  Output directory: {}", self.app.output_dir.display());
    }

    /// Interactive configuration setup
    pub async fn interactive_setup(&self) -> Result<()> {
        println!("Interactive configuration setup coming soon!");
        println!("For now, please edit the config file manually:");
        println!("  {}", Self::config_path()?.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.fetch.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.restore.endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.fetch.max_attempts, config.fetch.max_attempts);
        assert_eq!(parsed.app.default_language, config.app.default_language);
    }
}
