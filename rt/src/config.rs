//! Roadtrip configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::planning::{GroundingTool, InvocationMode};

/// Main roadtrip configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Directory for the log file
    #[serde(rename = "log-dir")]
    pub log_dir: Option<PathBuf>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// How the planning service is invoked
    pub planner: PlannerConfig,

    /// Storage configuration
    pub storage: StorageConfig,
}

impl Config {
    /// Validate configuration before a planning call
    ///
    /// Checks that the API key environment variable is set.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .roadtrip.yml
        let local_config = PathBuf::from(".roadtrip.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/roadtrip/roadtrip.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_early(config_path).and_then(|c| c.log_level)
    }

    /// Read only the log directory, before logging is set up
    pub fn load_log_dir(config_path: Option<&PathBuf>) -> Option<PathBuf> {
        Self::load_early(config_path).and_then(|c| c.log_dir)
    }

    fn load_early(config_path: Option<&PathBuf>) -> Option<Self> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from(".roadtrip.yml")),
            Self::user_config_path(),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str(&content).ok())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("roadtrip").join("roadtrip.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory for the log file
    pub fn default_log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roadtrip")
            .join("logs")
    }
}

/// LLM provider configuration
///
/// `model`, `api-key-env` and `base-url` default per provider when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "LlmConfigFile")]
pub struct LlmConfig {
    /// Provider name ("gemini" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds; unset means no local timeout
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::for_provider("gemini")
    }
}

/// The `llm` section as written, before provider defaults are applied
#[derive(Debug, Deserialize)]
#[serde(default)]
struct LlmConfigFile {
    provider: String,
    model: Option<String>,
    #[serde(rename = "api-key-env")]
    api_key_env: Option<String>,
    #[serde(rename = "base-url")]
    base_url: Option<String>,
    #[serde(rename = "max-tokens")]
    max_tokens: u32,
    #[serde(rename = "timeout-ms")]
    timeout_ms: Option<u64>,
}

impl Default for LlmConfigFile {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            api_key_env: None,
            base_url: None,
            max_tokens: 8192,
            timeout_ms: None,
        }
    }
}

impl From<LlmConfigFile> for LlmConfig {
    fn from(file: LlmConfigFile) -> Self {
        let defaults = Self::for_provider(&file.provider);
        Self {
            provider: file.provider,
            model: file.model.unwrap_or(defaults.model),
            api_key_env: file.api_key_env.unwrap_or(defaults.api_key_env),
            base_url: file.base_url.unwrap_or(defaults.base_url),
            max_tokens: file.max_tokens,
            timeout_ms: file.timeout_ms,
        }
    }
}

impl LlmConfig {
    /// Default settings for a provider
    ///
    /// Unknown providers get the Gemini endpoint; `create_client` rejects them.
    pub fn for_provider(provider: &str) -> Self {
        let (model, api_key_env, base_url) = match provider {
            "openai" => ("gpt-4o", "OPENAI_API_KEY", "https://api.openai.com"),
            _ => (
                "gemini-2.5-flash",
                "GEMINI_API_KEY",
                "https://generativelanguage.googleapis.com",
            ),
        };
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            api_key_env: api_key_env.to_string(),
            base_url: base_url.to_string(),
            max_tokens: 8192,
            timeout_ms: None,
        }
    }

    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        let key = std::env::var(&self.api_key_env)
            .context(format!("Environment variable {} is not set", self.api_key_env))?;
        if key.trim().is_empty() {
            return Err(eyre::eyre!("Environment variable {} is empty", self.api_key_env));
        }
        Ok(key)
    }
}

/// Planning call configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Invocation mode: strict-schema or tool-augmented
    pub mode: InvocationMode,

    /// Grounding tool used in tool-augmented mode
    pub grounding: GroundingTool,

    /// Sampling temperature
    pub temperature: f32,

    /// Directory with `.pmt` prompt overrides
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mode: InvocationMode::StrictSchema,
            grounding: GroundingTool::Maps,
            temperature: 0.2,
            prompts_dir: None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted trip state
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/roadtrip on Linux)
        let dir = dirs::data_dir()
            .map(|d| d.join("roadtrip").join("state"))
            .unwrap_or_else(|| PathBuf::from(".roadtrip"));

        Self { dir }
    }
}

impl StorageConfig {
    /// Storage dir with a leading `~/` expanded
    pub fn expanded_dir(&self) -> PathBuf {
        match self.dir.to_str().and_then(|s| s.strip_prefix("~/")) {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| self.dir.clone()),
            None => self.dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.planner.mode, InvocationMode::StrictSchema);
        assert_eq!(config.planner.temperature, 0.2);
        assert!(config.llm.timeout_ms.is_none());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug

llm:
  provider: openai
  model: gpt-4o
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 60000

planner:
  mode: tool-augmented
  grounding: search
  temperature: 0.5

storage:
  dir: /tmp/roadtrip-state
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.timeout_ms, Some(60000));
        assert_eq!(config.planner.mode, InvocationMode::ToolAugmented);
        assert_eq!(config.planner.grounding, GroundingTool::Search);
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/roadtrip-state"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-2.5-pro
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "gemini-2.5-pro");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.planner.mode, InvocationMode::StrictSchema);
        assert_eq!(config.planner.grounding, GroundingTool::Maps);
    }

    #[test]
    fn test_openai_provider_gets_its_own_defaults() {
        let yaml = "llm:\n  provider: openai\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.base_url, "https://api.openai.com");
        assert_eq!(config.llm.max_tokens, 8192);
    }

    #[test]
    fn test_provider_defaults_yield_to_explicit_values() {
        let yaml = "llm:\n  provider: openai\n  base-url: http://localhost:8080\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.base_url, "http://localhost:8080");
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roadtrip.yml");
        std::fs::write(&path, "log-level: warn\nstorage:\n  dir: /tmp/x\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/x"));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/definitely/not/here/roadtrip.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "ROADTRIP_TEST_KEY_UNSET".to_string();
        unsafe { std::env::remove_var("ROADTRIP_TEST_KEY_UNSET") };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_get_api_key_reads_env() {
        let mut config = LlmConfig::default();
        config.api_key_env = "ROADTRIP_TEST_KEY_SET".to_string();
        unsafe { std::env::set_var("ROADTRIP_TEST_KEY_SET", "secret") };
        assert_eq!(config.get_api_key().unwrap(), "secret");
        unsafe { std::env::remove_var("ROADTRIP_TEST_KEY_SET") };
    }

    #[test]
    fn test_expanded_dir() {
        let storage = StorageConfig {
            dir: PathBuf::from("/abs/path"),
        };
        assert_eq!(storage.expanded_dir(), PathBuf::from("/abs/path"));
    }
}
