//! Configuration module for the ERP assistant gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use erp_assistant_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// Default OpenAI API base URL (chat completions, transcription and speech).
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
/// Default chat completion model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
/// System instruction sent with every language-model completion.
pub const DEFAULT_LLM_SYSTEM_PROMPT: &str =
    "Você é um assistente da empresa com acesso ao Tiny ERP.";
/// Default Tiny ERP API v2 base URL.
pub const DEFAULT_ERP_BASE_URL: &str = "https://api.tiny.com.br/api2";
/// Default WPPConnect send-message endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:21465/api/send-message";
/// Default webhook verify token.
pub const DEFAULT_VERIFY_TOKEN: &str = "meu_token_secreto";
/// Default shared secret for the voice endpoint.
pub const DEFAULT_VOICE_API_KEY: &str = "1segredo123";
/// Default Google speech endpoint.
pub const DEFAULT_GOOGLE_TTS_URL: &str = "https://translate.google.com/translate_tts";
/// Default OpenAI speech model.
pub const DEFAULT_TTS_MODEL: &str = "tts-1";
/// Reply audio file name, overwritten on every call unless unique names are enabled.
pub const DEFAULT_AUDIO_OUTPUT_FILE_NAME: &str = "resposta.mp3";
/// Default maximum accepted voice upload (matches the transcription API file limit).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// TLS configuration for HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Speech synthesis backend used by the voice pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtsProviderKind {
    /// Google Translate speech endpoint (Portuguese voice selected by language)
    #[default]
    Google,
    /// OpenAI Audio Speech API
    OpenAI,
}

impl TtsProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenAI => "openai",
        }
    }
}

impl std::str::FromStr for TtsProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gtts" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAI),
            other => Err(format!(
                "Unsupported TTS provider '{other}'. Expected 'google' or 'openai'"
            )),
        }
    }
}

/// Server configuration
///
/// Contains everything the gateway needs at runtime:
/// - Server settings (host, port, TLS)
/// - Language model credentials and prompt
/// - ERP credentials
/// - WhatsApp gateway settings and the webhook verify token
/// - Voice pipeline settings (shared secret, TTS backend, ffmpeg, output directory)
/// - Security settings (CORS, rate limiting)
///
/// Built once at startup and shared read-only through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Language model
    /// OpenAI API key used for chat completions, Whisper and OpenAI TTS
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API (without the `/v1` suffix)
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_system_prompt: String,

    // ERP
    /// Tiny ERP API token (sent as the `token` query parameter)
    pub erp_api_token: Option<String>,
    pub erp_base_url: String,

    // WhatsApp gateway
    /// Full URL of the WPPConnect send-message endpoint
    pub gateway_url: String,
    /// Optional bearer token for the WPPConnect session
    pub gateway_token: Option<String>,
    /// Token expected in `hub.verify_token` during the subscription handshake
    pub verify_token: String,
    /// Skip group, status and newsletter events (off unless enabled)
    pub ignore_group_messages: bool,
    pub wait_for_ack: bool,
    /// Send messages longer than 160 characters with `format: "full"`
    pub full_format_long_messages: bool,
    pub send_delay_ms: u64,

    // Voice pipeline
    /// Shared secret expected in the `x-token` header of `/voz`
    pub voice_api_key: String,
    pub tts_provider: TtsProviderKind,
    /// Voice name for the OpenAI TTS backend
    pub tts_voice: String,
    /// Model name for the OpenAI TTS backend
    pub tts_model: String,
    /// Google speech endpoint
    pub google_tts_url: String,
    pub ffmpeg_path: PathBuf,
    pub audio_output_dir: PathBuf,
    /// Reply file name inside `audio_output_dir`, shared by every request
    pub audio_output_file_name: String,
    /// Write each reply to `resposta-{uuid}.mp3` instead of the shared file
    pub audio_unique_names: bool,
    pub max_upload_bytes: usize,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            tls: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_system_prompt: DEFAULT_LLM_SYSTEM_PROMPT.to_string(),
            erp_api_token: None,
            erp_base_url: DEFAULT_ERP_BASE_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            gateway_token: None,
            verify_token: DEFAULT_VERIFY_TOKEN.to_string(),
            ignore_group_messages: false,
            wait_for_ack: false,
            full_format_long_messages: false,
            send_delay_ms: 0,
            voice_api_key: DEFAULT_VOICE_API_KEY.to_string(),
            tts_provider: TtsProviderKind::default(),
            tts_voice: "alloy".to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            google_tts_url: DEFAULT_GOOGLE_TTS_URL.to_string(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            audio_output_dir: std::env::temp_dir(),
            audio_output_file_name: DEFAULT_AUDIO_OUTPUT_FILE_NAME.to_string(),
            audio_unique_names: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Zeroize every secret when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.openai_api_key {
            key.zeroize();
        }
        if let Some(ref mut token) = self.erp_api_token {
            token.zeroize();
        }
        if let Some(ref mut token) = self.gateway_token {
            token.zeroize();
        }
        self.verify_token.zeroize();
        self.voice_api_key.zeroize();
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// The `.env` file is loaded in `main` before this is called, so actual
    /// environment variables take precedence over `.env` values.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_tls(&config.tls)?;
        validation::validate_output_file_name(&config.audio_output_file_name)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;

        validation::validate_tls(&config.tls)?;
        validation::validate_output_file_name(&config.audio_output_file_name)?;

        Ok(config)
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Full URL of the chat completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.openai_base_url.trim_end_matches('/')
        )
    }

    /// Full URL of the audio transcription endpoint
    pub fn transcriptions_url(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.openai_base_url.trim_end_matches('/')
        )
    }

    /// Full URL of the speech synthesis endpoint
    pub fn speech_url(&self) -> String {
        format!("{}/v1/audio/speech", self.openai_base_url.trim_end_matches('/'))
    }

    /// Names of optional credentials that are not configured.
    ///
    /// Used at startup to warn about request paths that will fall back.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.as_deref().is_none_or(str::is_empty) {
            missing.push("OPENAI_API_KEY");
        }
        if self.erp_api_token.as_deref().is_none_or(str::is_empty) {
            missing.push("TINY_API_TOKEN");
        }
        missing
    }
}
