//! Batch downloader for AES-128 encrypted m3u8 streams.
//!
//! For every playlist URL of a batch:
//!
//! ```text
//! fetch playlist ─► resolve key ─► fetch key ─► fetch segments ─► mux ─► rename to sha256
//!                                                 (paced)
//! ```
//!
//! Jobs run one after another through a single scratch directory, which is
//! cleared after each job. A failing job never stops the batch.

pub mod config;
pub mod digest;
pub mod download;
pub mod error;
pub mod fetch;
pub mod hls;
pub mod mux;
pub mod pacing;
pub mod scratch;
pub mod util;

pub use config::DownloadConfig;
pub use download::{BatchDownloader, BatchReport, JobOutcome, JobState};
pub use error::{M3u8DlError, M3u8DlResult};
pub use fetch::Fetcher;
pub use mux::{FfmpegMuxer, MuxFailurePolicy, MuxStatus, Muxer};
pub use pacing::{FixedIntervalPacer, Pacer};
pub use util::http::HttpClient;
