use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use fake_user_agent::get_chrome_rua;
use m3u8dl::{
    util::http::parse_header,
    DownloadConfig, FfmpegMuxer, HttpClient, MuxFailurePolicy,
};

/// Download every m3u8 playlist listed in a file, one after another.
#[derive(clap::Parser, Debug, Clone)]
#[clap(version, about)]
pub struct M3u8DlArgs {
    /// Batch input, one playlist URL per line
    ///
    /// Blank lines and lines starting with `#` are ignored.
    #[clap(default_value = "m3u8_list.txt")]
    pub list: PathBuf,

    /// TOML file with download settings
    ///
    /// Options given on the command line take precedence over the file.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Debug output
    #[clap(long, alias = "debug")]
    pub verbose: bool,

    /// Scratch directory, cleared between jobs
    #[clap(long)]
    temp_dir: Option<PathBuf>,

    /// Directory finalized files are moved to
    #[clap(short, long)]
    output_dir: Option<PathBuf>,

    /// Seconds to wait after every segment
    #[clap(long)]
    segment_delay: Option<u64>,

    /// Seconds to wait after every playlist
    #[clap(long)]
    job_delay: Option<u64>,

    /// HTTP timeout in seconds
    #[clap(long)]
    timeout: Option<u64>,

    /// Only lines containing this marker are segments
    #[clap(long)]
    segment_marker: Option<String>,

    /// Treat every non-directive line as a segment
    #[clap(long, conflicts_with = "segment_marker")]
    any_segment: bool,

    /// HTTP Header used to download
    ///
    /// Custom header. eg. "Referer: https://example.com/"
    #[clap(short = 'H', long)]
    headers: Vec<String>,

    /// Fail a job when ffmpeg exits with an error, even if it produced a file
    #[clap(long)]
    strict_mux: bool,

    /// ffmpeg executable to use
    #[clap(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

impl M3u8DlArgs {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    /// Settings from `--config`, overridden by the command line.
    pub fn download_config(&self) -> anyhow::Result<DownloadConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => DownloadConfig::default(),
        };

        if let Some(temp_dir) = &self.temp_dir {
            config.scratch_dir = temp_dir.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(delay) = self.segment_delay {
            config.segment_interval = Duration::from_secs(delay);
        }
        if let Some(delay) = self.job_delay {
            config.job_interval = Duration::from_secs(delay);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Duration::from_secs(timeout);
        }
        if self.any_segment {
            config.segment_marker = None;
        } else if let Some(marker) = &self.segment_marker {
            config.segment_marker = Some(marker.clone());
        }
        for header in &self.headers {
            let (key, value) = parse_header(header)?;
            config.headers.insert(key, value);
        }
        if self.strict_mux {
            config.mux_failure = MuxFailurePolicy::Strict;
        }

        Ok(config)
    }

    pub fn client(&self, config: &DownloadConfig) -> anyhow::Result<HttpClient> {
        Ok(HttpClient::with_headers(
            &config.headers,
            get_chrome_rua(),
            config.timeout,
        )?)
    }

    pub fn muxer(&self) -> FfmpegMuxer {
        FfmpegMuxer::with_program(&self.ffmpeg)
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<DownloadConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&data).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn parse_config(data: &str) -> anyhow::Result<DownloadConfig> {
    Ok(toml::from_str(data)?)
}
