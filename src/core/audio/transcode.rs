use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transcoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Transcoder produced no output")]
    EmptyOutput,
}

/// Converts an audio file on disk to MP3.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Read `input`, write MP3 to `output`. `output` may already exist and
    /// is overwritten.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Shells out to an `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn args<'a>(input: &'a Path, output: &'a Path) -> Vec<&'a OsStr> {
        let mut args: Vec<&OsStr> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsStr::new)
            .collect();
        args.push(input.as_os_str());
        args.extend(["-vn", "-f", "mp3"].into_iter().map(OsStr::new));
        args.push(output.as_os_str());
        args
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        debug!(input = %input.display(), output = %output.display(), "Transcoding to mp3");

        let result = Command::new(&self.binary)
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!(status = %result.status, stderr = %stderr, "ffmpeg failed");
            return Err(TranscodeError::Failed {
                status: result.status.to_string(),
                stderr,
            });
        }

        let size = tokio::fs::metadata(output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if size == 0 {
            return Err(TranscodeError::EmptyOutput);
        }
        Ok(())
    }
}
