use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub model: ModelConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    pub resume_dir: PathBuf,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file written next to the console output; unset disables it
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("agent.log")),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load(&format!("config/{run_mode}"), "config/local")
    }

    fn load(mode_file: &str, local_file: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("model.name", "gemini-2.0-flash")?
            .set_default("model.base_url", agent_hooks::model::gemini::DEFAULT_BASE_URL)?
            .set_default("model.api_key", "")?
            .set_default("model.timeout_seconds", 120)?
            .set_default("storage.resume_dir", "resume_memory")?
            .set_default("storage.enabled", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.file", "agent.log")?
            .add_source(File::with_name(mode_file).required(false))
            .add_source(File::with_name(local_file).required(false))
            .add_source(Environment::with_prefix("AGENT_HOOKS").separator("__"))
            .set_override_option("model.name", env::var("MODEL").ok())?
            .set_override_option("model.api_key", env::var("GOOGLE_API_KEY").ok())?
            .build()?;

        s.try_deserialize()
    }
}
