pub mod audio;
pub mod erp;
pub mod llm;
pub mod openai;
pub mod responder;
pub mod stt;
pub mod tts;
pub mod voice;
pub mod whatsapp;

// Re-export commonly used types for convenience
pub use audio::{AudioTranscoder, FfmpegTranscoder, TranscodeError};
pub use erp::{ErpError, TinyErpClient};
pub use llm::{LlmError, OpenAIChat};
pub use responder::{IntentHandler, IntentRule, Responder, ResponderError};
pub use stt::{BaseSTT, OpenAISTT, STTError, STTResult};
pub use tts::{BaseTTS, BoxedTTS, TTSError, TTSResult, create_tts_provider};
pub use voice::{AudioOutput, VoiceError, VoicePipeline, VoiceReply};
pub use whatsapp::{GatewayError, InboundEvent, InboundMessage, WppConnectClient};
