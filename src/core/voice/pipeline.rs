use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use super::{AudioOutput, VoiceError, VoiceReply};
use crate::core::audio::AudioTranscoder;
use crate::core::responder::Responder;
use crate::core::stt::BaseSTT;
use crate::core::tts::BaseTTS;

/// Transcode, transcribe, answer and synthesize one uploaded voice message.
pub struct VoicePipeline {
    transcoder: Arc<dyn AudioTranscoder>,
    stt: Box<dyn BaseSTT>,
    tts: Box<dyn BaseTTS>,
    output: AudioOutput,
}

impl std::fmt::Debug for VoicePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoicePipeline")
            .field("stt", &self.stt.provider_name())
            .field("tts", &self.tts.provider_name())
            .field("output", &self.output)
            .finish()
    }
}

fn scoped_temp_file(suffix: &str) -> std::io::Result<tempfile::NamedTempFile> {
    tempfile::Builder::new()
        .prefix("voz-")
        .suffix(suffix)
        .tempfile()
}

impl VoicePipeline {
    pub fn new(
        transcoder: Arc<dyn AudioTranscoder>,
        stt: Box<dyn BaseSTT>,
        tts: Box<dyn BaseTTS>,
        output: AudioOutput,
    ) -> Self {
        Self {
            transcoder,
            stt,
            tts,
            output,
        }
    }

    pub fn output(&self) -> &AudioOutput {
        &self.output
    }

    /// Run the whole pipeline for one upload.
    ///
    /// The temporary input and MP3 files are removed when this returns,
    /// whether it succeeds or not.
    pub async fn process(
        &self,
        upload: Bytes,
        responder: &Responder,
        request_id: Uuid,
    ) -> Result<VoiceReply, VoiceError> {
        if upload.is_empty() {
            return Err(VoiceError::Upload("uploaded file is empty".into()));
        }

        let input = scoped_temp_file(".ogg")?;
        tokio::fs::write(input.path(), &upload).await?;

        let mp3 = scoped_temp_file(".mp3")?;
        self.transcoder.transcode(input.path(), mp3.path()).await?;

        let pergunta = self.stt.transcribe_file(mp3.path()).await?;
        info!(%request_id, chars = pergunta.len(), "Voice question transcribed");

        let resposta = responder.respond(&pergunta).await;

        let audio = self.tts.synthesize(&resposta).await?;
        tokio::fs::create_dir_all(self.output.dir()).await?;
        let audio_path = self.output.path_for(request_id, self.tts.file_extension());
        tokio::fs::write(&audio_path, &audio).await?;

        info!(
            %request_id,
            path = %audio_path.display(),
            bytes = audio.len(),
            "Voice reply synthesized"
        );

        Ok(VoiceReply {
            pergunta,
            resposta,
            audio: audio_path.display().to_string(),
        })
    }
}
