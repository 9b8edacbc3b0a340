//! Voice question pipeline.
//!
//! Upload → temporary `.ogg` → MP3 → transcript → [`Responder`] → synthesized
//! reply written to the audio output directory.
//!
//! [`Responder`]: crate::core::responder::Responder

mod pipeline;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::core::audio::TranscodeError;
use crate::core::stt::STTError;
use crate::core::tts::TTSError;

pub use pipeline::VoicePipeline;

/// Message returned to the client when any pipeline step fails.
pub const VOICE_ERROR_MESSAGE: &str = "Não foi possível processar o áudio.";

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("No file in upload")]
    MissingFile,

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcoding failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] STTError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] TTSError),
}

/// Successful pipeline result, serialized as the `/voz` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceReply {
    pub pergunta: String,
    pub resposta: String,
    /// Path of the synthesized reply
    pub audio: String,
}

/// Where synthesized replies are written.
#[derive(Debug, Clone)]
pub struct AudioOutput {
    dir: PathBuf,
    fixed_name: Option<String>,
}

impl AudioOutput {
    pub fn new(dir: impl Into<PathBuf>, fixed_name: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            fixed_name,
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// `resposta-{request_id}.{ext}`, or the fixed name when one is configured.
    pub fn path_for(&self, request_id: Uuid, extension: &str) -> PathBuf {
        match &self.fixed_name {
            Some(name) => self.dir.join(name),
            None => self.dir.join(format!("resposta-{request_id}.{extension}")),
        }
    }
}
