//! Environment variable loading.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ServerConfig, TlsConfig, TtsProviderKind};

/// Read a non-empty environment variable.
pub(super) fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable into `T`, reporting the variable name on failure.
pub(super) fn env_parse<T>(key: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {key} ('{raw}'): {e}").into()),
        None => Ok(None),
    }
}

/// Parse a boolean flag. Accepts true/false, 1/0, yes/no, on/off.
pub(super) fn parse_bool(key: &str, raw: &str) -> Result<bool, Box<dyn std::error::Error>> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!("Invalid boolean for {key}: '{raw}'").into()),
    }
}

fn env_bool(key: &str) -> Result<Option<bool>, Box<dyn std::error::Error>> {
    env_var(key).map(|raw| parse_bool(key, &raw)).transpose()
}

/// Build a configuration from environment variables layered over defaults.
pub(super) fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = ServerConfig::default();

    if let Some(host) = env_var("HOST") {
        config.host = host;
    }
    if let Some(port) = env_parse::<u16>("PORT")? {
        config.port = port;
    }

    config.tls = match (env_var("TLS_CERT_PATH"), env_var("TLS_KEY_PATH")) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => return Err("TLS_CERT_PATH and TLS_KEY_PATH must be set together".into()),
    };

    // Language model
    config.openai_api_key = env_var("OPENAI_API_KEY");
    if let Some(url) = env_var("OPENAI_BASE_URL") {
        config.openai_base_url = url;
    }
    if let Some(model) = env_var("OPENAI_CHAT_MODEL") {
        config.llm_model = model;
    }
    if let Some(prompt) = env_var("LLM_SYSTEM_PROMPT") {
        config.llm_system_prompt = prompt;
    }

    // ERP
    config.erp_api_token = env_var("TINY_API_TOKEN");
    if let Some(url) = env_var("TINY_API_URL") {
        config.erp_base_url = url;
    }

    // WhatsApp gateway
    if let Some(url) = env_var("WPP_GATEWAY_URL") {
        config.gateway_url = url;
    }
    config.gateway_token = env_var("WPP_GATEWAY_TOKEN");
    if let Some(token) = env_var("VERIFY_TOKEN") {
        config.verify_token = token;
    }
    if let Some(flag) = env_bool("WPP_IGNORE_GROUPS")? {
        config.ignore_group_messages = flag;
    }
    if let Some(flag) = env_bool("WPP_WAIT_FOR_ACK")? {
        config.wait_for_ack = flag;
    }
    if let Some(flag) = env_bool("WPP_FULL_FORMAT_LONG_MESSAGES")? {
        config.full_format_long_messages = flag;
    }
    if let Some(delay) = env_parse::<u64>("WPP_SEND_DELAY_MS")? {
        config.send_delay_ms = delay;
    }

    // Voice pipeline
    if let Some(key) = env_var("VOZ_API_KEY") {
        config.voice_api_key = key;
    }
    if let Some(provider) = env_parse::<TtsProviderKind>("TTS_PROVIDER")? {
        config.tts_provider = provider;
    }
    if let Some(voice) = env_var("TTS_VOICE") {
        config.tts_voice = voice;
    }
    if let Some(model) = env_var("TTS_MODEL") {
        config.tts_model = model;
    }
    if let Some(url) = env_var("GOOGLE_TTS_URL") {
        config.google_tts_url = url;
    }
    if let Some(path) = env_var("FFMPEG_PATH") {
        config.ffmpeg_path = PathBuf::from(path);
    }
    if let Some(dir) = env_var("AUDIO_OUTPUT_DIR") {
        config.audio_output_dir = PathBuf::from(dir);
    }
    if let Some(name) = env_var("AUDIO_OUTPUT_FILE_NAME") {
        config.audio_output_file_name = name;
    }
    if let Some(flag) = env_bool("AUDIO_UNIQUE_NAMES")? {
        config.audio_unique_names = flag;
    }
    if let Some(max) = env_parse::<usize>("MAX_UPLOAD_BYTES")? {
        config.max_upload_bytes = max;
    }

    // Security
    config.cors_allowed_origins = env_var("CORS_ALLOWED_ORIGINS");
    if let Some(rps) = env_parse::<u32>("RATE_LIMIT_REQUESTS_PER_SECOND")? {
        config.rate_limit_requests_per_second = rps;
    }
    if let Some(burst) = env_parse::<u32>("RATE_LIMIT_BURST_SIZE")? {
        config.rate_limit_burst_size = burst;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "YES").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
