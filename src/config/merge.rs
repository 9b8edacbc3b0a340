//! Merging of YAML overrides onto the environment-derived configuration.

use std::path::PathBuf;

use super::env::load_from_env;
use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig, TtsProviderKind};

/// Build the final configuration.
///
/// Environment variables (with defaults) form the base; any value present in the
/// YAML file replaces the corresponding base value.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = load_from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(tls) = server.tls {
            if tls.enabled == Some(false) {
                config.tls = None;
            } else {
                match (tls.cert_path, tls.key_path) {
                    (Some(cert), Some(key)) => {
                        config.tls = Some(TlsConfig {
                            cert_path: PathBuf::from(cert),
                            key_path: PathBuf::from(key),
                        });
                    }
                    (None, None) => {}
                    _ => {
                        return Err(
                            "server.tls requires both cert_path and key_path".into()
                        );
                    }
                }
            }
        }
    }

    if let Some(providers) = yaml.providers {
        if let Some(key) = providers.openai_api_key {
            config.openai_api_key = Some(key);
        }
        if let Some(url) = providers.openai_base_url {
            config.openai_base_url = url;
        }
    }

    if let Some(llm) = yaml.llm {
        if let Some(model) = llm.model {
            config.llm_model = model;
        }
        if let Some(prompt) = llm.system_prompt {
            config.llm_system_prompt = prompt;
        }
    }

    if let Some(erp) = yaml.erp {
        if let Some(token) = erp.api_token {
            config.erp_api_token = Some(token);
        }
        if let Some(url) = erp.base_url {
            config.erp_base_url = url;
        }
    }

    if let Some(whatsapp) = yaml.whatsapp {
        if let Some(url) = whatsapp.gateway_url {
            config.gateway_url = url;
        }
        if let Some(token) = whatsapp.gateway_token {
            config.gateway_token = Some(token);
        }
        if let Some(token) = whatsapp.verify_token {
            config.verify_token = token;
        }
        if let Some(flag) = whatsapp.ignore_groups {
            config.ignore_group_messages = flag;
        }
        if let Some(flag) = whatsapp.wait_for_ack {
            config.wait_for_ack = flag;
        }
        if let Some(flag) = whatsapp.full_format_long_messages {
            config.full_format_long_messages = flag;
        }
        if let Some(delay) = whatsapp.send_delay_ms {
            config.send_delay_ms = delay;
        }
    }

    if let Some(voice) = yaml.voice {
        if let Some(key) = voice.api_key {
            config.voice_api_key = key;
        }
        if let Some(provider) = voice.tts_provider {
            config.tts_provider = provider.parse::<TtsProviderKind>()?;
        }
        if let Some(name) = voice.tts_voice {
            config.tts_voice = name;
        }
        if let Some(model) = voice.tts_model {
            config.tts_model = model;
        }
        if let Some(url) = voice.google_tts_url {
            config.google_tts_url = url;
        }
        if let Some(path) = voice.ffmpeg_path {
            config.ffmpeg_path = PathBuf::from(path);
        }
        if let Some(dir) = voice.output_dir {
            config.audio_output_dir = PathBuf::from(dir);
        }
        if let Some(name) = voice.output_file_name {
            config.audio_output_file_name = name;
        }
        if let Some(flag) = voice.unique_names {
            config.audio_unique_names = flag;
        }
        if let Some(max) = voice.max_upload_bytes {
            config.max_upload_bytes = max;
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }
        if let Some(rps) = security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }

    Ok(config)
}
