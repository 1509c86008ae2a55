//! Muxing through the `ffmpeg` command line.
//!
//! The playlist is read from the scratch directory with local file access and
//! the stream's own crypto indirection allowed, and every stream is copied into
//! a single output file:
//!
//! ```text
//! ffmpeg -allowed_extensions ALL -protocol_whitelist crypto,file -i index.m3u8 -c copy out.ts
//! ```

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;

use crate::{
    error::M3u8DlResult,
    mux::{MuxStatus, Muxer},
};

#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    program: PathBuf,
}

impl FfmpegMuxer {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific executable, either a path or a name looked up in `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(input: &str, output: &str) -> Vec<String> {
        [
            "-allowed_extensions",
            "ALL",
            "-protocol_whitelist",
            "crypto,file",
            "-i",
            input,
            "-c",
            "copy",
            output,
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    fn resolve(&self) -> M3u8DlResult<PathBuf> {
        Ok(which::which(&self.program)?)
    }
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl Muxer for FfmpegMuxer {
    async fn ensure_available(&self) -> M3u8DlResult<()> {
        let ffmpeg = self.resolve()?;
        Command::new(&ffmpeg)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        log::debug!("Using muxer at {}", ffmpeg.display());
        Ok(())
    }

    async fn mux(&self, cwd: &Path, input: &str, output: &str) -> M3u8DlResult<MuxStatus> {
        let ffmpeg = self.resolve()?;
        log::debug!("Muxing {input} into {output} with ffmpeg CLI...");

        let result = Command::new(ffmpeg)
            .current_dir(cwd)
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(MuxStatus {
            code: result.status.code(),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        })
    }
}
