//! Configuration module for loading environment variables and settings.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat completion model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default speech synthesis model.
pub const DEFAULT_TTS_MODEL: &str = "tts-1";

/// Default speech synthesis voice.
pub const DEFAULT_TTS_VOICE: &str = "shimmer";

/// Default directory for file-delivered audio.
pub const DEFAULT_AUDIO_OUTPUT_DIR: &str = "public/audio";

/// Runtime mode, controlling how much error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    /// Error responses carry only the user-facing message.
    #[default]
    Production,
    /// Error responses also carry the raw error detail.
    Development,
}

impl RuntimeMode {
    /// Parse a mode name. Anything other than `production`/`prod` is development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }

    /// Whether raw error detail may be exposed to clients.
    pub fn exposes_details(&self) -> bool {
        !matches!(self, RuntimeMode::Production)
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Production => write!(f, "production"),
            RuntimeMode::Development => write!(f, "development"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Provider API key (required)
    pub openai_api_key: String,
    /// Provider API base URL, without trailing slash
    pub openai_base_url: String,
    /// Chat completion model identifier
    pub chat_model: String,
    /// Speech synthesis model identifier
    pub tts_model: String,
    /// Speech synthesis voice identifier
    pub tts_voice: String,
    /// Directory that file-delivered audio is written to
    pub audio_output_dir: PathBuf,
    /// Age after which stored audio files are pruned
    pub audio_retention: Option<Duration>,
    /// Runtime mode
    pub runtime_mode: RuntimeMode,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if OPENAI_API_KEY is not set, or
    /// `ConfigError::InvalidValue` if AUDIO_RETENTION_SECS is not a positive number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load a `.env` file into the process environment, if one exists.
    ///
    /// Safe to call more than once; variables already set are not overridden.
    pub fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key =
            get("OPENAI_API_KEY").ok_or_else(|| ConfigError::missing_env_var("OPENAI_API_KEY"))?;

        let openai_base_url = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let chat_model = get("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let tts_model = get("TTS_MODEL").unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string());
        let tts_voice = get("TTS_VOICE").unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string());

        let audio_output_dir = PathBuf::from(
            get("AUDIO_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_AUDIO_OUTPUT_DIR.to_string()),
        );

        let audio_retention = get("AUDIO_RETENTION_SECS")
            .map(|raw| match raw.trim().parse::<u64>() {
                Ok(0) => Err(ConfigError::invalid_value(
                    "AUDIO_RETENTION_SECS",
                    "must be at least 1 second",
                )),
                Ok(secs) => Ok(Duration::from_secs(secs)),
                Err(e) => Err(ConfigError::invalid_value("AUDIO_RETENTION_SECS", e.to_string())),
            })
            .transpose()?;

        let runtime_mode = get("APP_ENV")
            .map(|v| RuntimeMode::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            openai_api_key,
            openai_base_url,
            chat_model,
            tts_model,
            tts_voice,
            audio_output_dir,
            audio_retention,
            runtime_mode,
        })
    }

    /// Get the full URL for a provider API path such as `chat/completions`.
    pub fn openai_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.openai_base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .field("audio_output_dir", &self.audio_output_dir)
            .field("audio_retention", &self.audio_retention)
            .field("runtime_mode", &self.runtime_mode)
            .finish()
    }
}
