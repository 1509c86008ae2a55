use std::path::PathBuf;

use url::Url;

use crate::{
    config::DownloadConfig,
    digest::{content_file_name, digest_of},
    download::job::{JobOutcome, JobState},
    error::{M3u8DlError, M3u8DlResult},
    fetch::Fetcher,
    hls::{self, SegmentExtractor},
    mux::{MuxFailurePolicy, Muxer},
    pacing::Pacer,
    scratch::{move_file, ScratchDir},
    util::{
        path::scratch_relative_path,
        url::{base_url_of, directory_of, extract_path_and_filename, extract_subdomain},
    },
};

/// Downloads one playlist at a time, one segment at a time.
///
/// Every job runs through the scratch directory it is given. The caller is
/// responsible for clearing it between jobs.
pub struct SequencialDownloader<F, M, P> {
    fetcher: F,
    muxer: M,
    pacer: P,
    scratch: ScratchDir,
    extractor: SegmentExtractor,
    config: DownloadConfig,
}

impl<F, M, P> SequencialDownloader<F, M, P>
where
    F: Fetcher,
    M: Muxer,
    P: Pacer,
{
    pub fn new(config: DownloadConfig, fetcher: F, muxer: M, segment_pacer: P) -> Self {
        Self {
            fetcher,
            muxer,
            pacer: segment_pacer,
            scratch: ScratchDir::new(&config.scratch_dir),
            extractor: SegmentExtractor::new(config.segment_filter()),
            config,
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    pub fn muxer(&self) -> &M {
        &self.muxer
    }

    /// Run a job to completion. Errors are reported in the outcome together with
    /// the last state the job reached.
    pub async fn download(&self, url: &str) -> JobOutcome {
        let mut state = JobState::Idle;
        match self.run(url, &mut state).await {
            Ok(outcome) => outcome,
            Err(error) => JobOutcome::Failed {
                stage: state,
                error,
            },
        }
    }

    async fn run(&self, url: &str, state: &mut JobState) -> M3u8DlResult<JobOutcome> {
        let playlist_url = Url::parse(url)?;
        let playlist_dir = directory_of(&playlist_url);

        // manifest
        let manifest_bytes = self.fetcher.fetch(&playlist_url).await?;
        self.scratch
            .save(&self.config.manifest_filename, &manifest_bytes)
            .await?;
        let manifest = std::str::from_utf8(&manifest_bytes)
            .map_err(|_| M3u8DlError::ManifestParse("manifest is not valid UTF-8".to_string()))?;
        *state = JobState::ManifestFetched;

        // key
        let resolved = hls::resolve_if_encrypted(manifest)?;
        if let Some(resolved) = &resolved {
            self.scratch
                .save(&self.config.manifest_filename, resolved.manifest.as_bytes())
                .await?;
        } else {
            log::info!("{url} is not encrypted, skipping key.");
        }
        *state = JobState::KeyResolved;

        if let Some(resolved) = &resolved {
            let key_url = playlist_dir.join(&resolved.relative_path)?;
            let key_path = scratch_relative_path(&resolved.relative_path)?;
            let key = self.fetcher.fetch(&key_url).await?;
            self.scratch.save(key_path, &key).await?;
        }
        *state = JobState::KeyFetched;

        // segments
        let segments = self.extractor.extract(manifest);
        let play_duration = hls::extract_play_duration(manifest)?;
        log::info!(
            "Playlist {uid} on {base}: {count} segment(s), play duration {duration}",
            uid = extract_subdomain(&playlist_url),
            base = base_url_of(&playlist_url),
            count = segments.len(),
            duration = format_duration(play_duration.as_secs()),
        );
        if segments.is_empty() {
            log::warn!("No segment found in {url}.");
        }

        let total = segments.len();
        for (i, segment) in segments.into_iter().enumerate() {
            let segment_url = playlist_dir.join(segment)?;
            let segment_path = scratch_relative_path(segment)?;
            let data = self.fetcher.fetch(&segment_url).await?;
            self.scratch.save(segment_path, &data).await?;

            let (_, filename) = extract_path_and_filename(segment);
            let size_in_mb = data.len() as f64 / 1024. / 1024.;
            log::info!(
                "Segment {filename} downloaded ({}/{total}), {size_in_mb:.3} MB",
                i + 1
            );
            self.pacer.pace().await;
        }
        *state = JobState::SegmentsFetched;

        // mux
        let status = self
            .muxer
            .mux(
                self.scratch.path(),
                &self.config.manifest_filename,
                &self.config.output_filename,
            )
            .await?;
        if !status.is_success() {
            log::error!(
                "Muxer exited with code {:?} for {url}: {}",
                status.code,
                status.stderr.trim()
            );
            if self.config.mux_failure == MuxFailurePolicy::Strict {
                return Err(M3u8DlError::MuxerFailure {
                    code: status.code,
                    stderr: status.stderr,
                });
            }
        }
        *state = JobState::Muxed;

        // finalize
        let output = self.scratch.join(&self.config.output_filename);
        if !tokio::fs::try_exists(&output).await? {
            log::warn!(
                "Muxed output {} does not exist, skipping {url}.",
                output.display()
            );
            return Ok(JobOutcome::NoOutput);
        }

        let digest = digest_of(&output).await?;
        let file_name = content_file_name(&digest, &self.config.output_extension);
        let target: PathBuf = self.config.output_dir.join(&file_name);
        move_file(&output, &target).await?;
        *state = JobState::Finalized;

        log::info!("Download complete {url} → {file_name}");
        Ok(JobOutcome::Finalized {
            path: target,
            digest: hex::encode(digest),
        })
    }
}

fn format_duration(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}
