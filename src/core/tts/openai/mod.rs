//! OpenAI TTS.
//!
//! - Endpoint: `POST https://api.openai.com/v1/audio/speech`
//! - Models: tts-1, tts-1-hd, gpt-4o-mini-tts
//! - Output: MP3 only; the voice pipeline stores a single `.mp3` file

mod config;
mod provider;

pub use config::{AudioOutputFormat, OpenAITTSModel, OpenAIVoice};
pub use provider::OpenAITTS;
