//! OpenAI Whisper transcription.
//!
//! - Endpoint: `POST https://api.openai.com/v1/audio/transcriptions`
//! - Model: `whisper-1`, language fixed to Portuguese
//! - Upload: multipart form with the MP3 file under `file`

mod client;
mod messages;

pub use client::OpenAISTT;
pub use messages::TranscriptionResponse;

/// Model sent with every transcription request
pub const WHISPER_MODEL: &str = "whisper-1";
/// ISO-639-1 language hint
pub const WHISPER_LANGUAGE: &str = "pt";
