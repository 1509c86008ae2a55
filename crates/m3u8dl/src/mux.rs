mod ffmpeg;

pub use ffmpeg::FfmpegMuxer;

use std::{future::Future, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::M3u8DlResult;

/// Exit report of a muxer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxStatus {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl MuxStatus {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Repackages the local playlist of a job into one file without re-encoding.
pub trait Muxer: Send + Sync {
    /// Check that the muxer can run at all. Called once before the first job.
    fn ensure_available(&self) -> impl Future<Output = M3u8DlResult<()>> + Send;

    /// Mux `input` into `output`, both relative to `cwd`.
    fn mux(
        &self,
        cwd: &Path,
        input: &str,
        output: &str,
    ) -> impl Future<Output = M3u8DlResult<MuxStatus>> + Send;
}

/// What to do when the muxer exits unsuccessfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuxFailurePolicy {
    /// Log the failure and still finalize the output file if it exists.
    #[default]
    Optimistic,
    /// Fail the job without finalizing.
    Strict,
}
