use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::audio::{AudioTranscoder, FfmpegTranscoder};
use crate::core::erp::TinyErpClient;
use crate::core::llm::OpenAIChat;
use crate::core::responder::Responder;
use crate::core::stt::OpenAISTT;
use crate::core::tts::create_tts_provider;
use crate::core::voice::{AudioOutput, VoicePipeline};
use crate::core::whatsapp::WppConnectClient;

/// Shared, read-only application state.
///
/// Every outbound client shares one pooled `reqwest::Client`.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub llm: OpenAIChat,
    pub responder: Responder,
    pub sender: WppConnectClient,
    pub voice: VoicePipeline,
}

impl AppState {
    /// Build state with the ffmpeg binary from the configuration.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let transcoder = Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone()));
        Self::with_transcoder(config, transcoder)
    }

    pub fn with_transcoder(config: ServerConfig, transcoder: Arc<dyn AudioTranscoder>) -> Arc<Self> {
        let http_client = Client::new();

        let llm = OpenAIChat::from_config(http_client.clone(), &config);
        let erp = TinyErpClient::from_config(http_client.clone(), &config);
        let responder = Responder::with_default_rules(erp, llm.clone());
        let sender = WppConnectClient::from_config(http_client.clone(), &config);

        let tts = create_tts_provider(&config, http_client.clone());
        let stt = OpenAISTT::from_config(http_client, &config);
        let voice = VoicePipeline::new(
            transcoder,
            Box::new(stt),
            tts,
            AudioOutput::new(
                config.audio_output_dir.clone(),
                (!config.audio_unique_names).then(|| config.audio_output_file_name.clone()),
            ),
        );

        info!(
            llm_model = %llm.model(),
            tts_provider = config.tts_provider.as_str(),
            gateway = %sender.url(),
            "Application state initialized"
        );

        Arc::new(Self {
            config,
            llm,
            responder,
            sender,
            voice,
        })
    }
}
