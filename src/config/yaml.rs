use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in the
/// file override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///
/// providers:
///   openai_api_key: "sk-..."
///   openai_base_url: "https://api.openai.com"
///
/// llm:
///   model: "gpt-3.5-turbo"
///
/// erp:
///   api_token: "tiny-token"
///
/// whatsapp:
///   gateway_url: "http://localhost:21465/api/send-message"
///   verify_token: "meu_token_secreto"
///   ignore_groups: false
///
/// voice:
///   api_key: "1segredo123"
///   tts_provider: "google"
///   ffmpeg_path: "/usr/bin/ffmpeg"
///   output_dir: "/tmp"
///   output_file_name: "resposta.mp3"
///   unique_names: false
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub providers: Option<ProvidersYaml>,
    pub llm: Option<LlmYaml>,
    pub erp: Option<ErpYaml>,
    pub whatsapp: Option<WhatsAppYaml>,
    pub voice: Option<VoiceYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Provider credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    /// OpenAI API key for chat completions, Whisper and TTS
    pub openai_api_key: Option<String>,
    /// OpenAI-compatible base URL (no `/v1` suffix)
    pub openai_base_url: Option<String>,
}

/// Language model settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LlmYaml {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
}

/// Tiny ERP settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ErpYaml {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
}

/// WhatsApp gateway settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WhatsAppYaml {
    pub gateway_url: Option<String>,
    pub gateway_token: Option<String>,
    pub verify_token: Option<String>,
    pub ignore_groups: Option<bool>,
    pub wait_for_ack: Option<bool>,
    pub full_format_long_messages: Option<bool>,
    pub send_delay_ms: Option<u64>,
}

/// Voice pipeline settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct VoiceYaml {
    pub api_key: Option<String>,
    /// "google" or "openai"
    pub tts_provider: Option<String>,
    pub tts_voice: Option<String>,
    /// "tts-1", "tts-1-hd" or "gpt-4o-mini-tts"
    pub tts_model: Option<String>,
    pub google_tts_url: Option<String>,
    pub ffmpeg_path: Option<String>,
    pub output_dir: Option<String>,
    pub output_file_name: Option<String>,
    /// Per-request reply file names
    pub unique_names: Option<bool>,
    pub max_upload_bytes: Option<usize>,
}

/// Security configuration from YAML
///
/// # Example YAML structure
/// ```yaml
/// security:
///   cors_allowed_origins: "https://example.com,https://app.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Required fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
