use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum M3u8DlError {
    #[error("Download failed \"{url}\" ({status}): {body}")]
    DownloadFailure {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid m3u8 file: {0}")]
    ManifestParse(String),

    #[error("Muxer exited with code {code:?}: {stderr}")]
    MuxerFailure { code: Option<i32>, stderr: String },

    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),

    #[error("Scratch directory is not usable: {}", .0.display())]
    ScratchDir(PathBuf),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    #[error(transparent)]
    MissingExecutable(#[from] which::Error),
}

pub type M3u8DlResult<T> = Result<T, M3u8DlError>;
