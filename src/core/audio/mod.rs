//! Audio format conversion for uploaded voice messages.

mod transcode;

pub use transcode::{AudioTranscoder, FfmpegTranscoder, TranscodeError};
