use crate::{
    config::DownloadConfig,
    download::{
        job::{BatchReport, JobOutcome, JobReport},
        sequencial::SequencialDownloader,
    },
    error::M3u8DlResult,
    fetch::Fetcher,
    mux::Muxer,
    pacing::{FixedIntervalPacer, Pacer},
};

/// Playlist URLs of a batch input, one per line.
///
/// Blank lines and `#` comments are skipped.
pub fn parse_batch(input: &str) -> Vec<&str> {
    input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).trim())
        .filter(|line| !line.is_empty())
        .filter(|line| {
            if line.starts_with('#') {
                log::info!("Skipping comment: {line}");
                return false;
            }
            true
        })
        .collect()
}

/// Runs every job of a batch in order, isolating their failures.
pub struct BatchDownloader<F, M, P = FixedIntervalPacer> {
    downloader: SequencialDownloader<F, M, P>,
    job_pacer: P,
}

impl<F, M> BatchDownloader<F, M, FixedIntervalPacer>
where
    F: Fetcher,
    M: Muxer,
{
    /// Pace segments and jobs with the intervals of `config`.
    pub fn new(config: DownloadConfig, fetcher: F, muxer: M) -> Self {
        let segment_pacer = FixedIntervalPacer::new(config.segment_interval);
        let job_pacer = FixedIntervalPacer::new(config.job_interval);
        Self::with_pacers(config, fetcher, muxer, segment_pacer, job_pacer)
    }
}

impl<F, M, P> BatchDownloader<F, M, P>
where
    F: Fetcher,
    M: Muxer,
    P: Pacer,
{
    pub fn with_pacers(
        config: DownloadConfig,
        fetcher: F,
        muxer: M,
        segment_pacer: P,
        job_pacer: P,
    ) -> Self {
        Self {
            downloader: SequencialDownloader::new(config, fetcher, muxer, segment_pacer),
            job_pacer,
        }
    }

    /// Parse `input` with [parse_batch] and run the resulting jobs.
    pub async fn run_input(&self, input: &str) -> M3u8DlResult<BatchReport> {
        self.run(parse_batch(input)).await
    }

    /// Run jobs for `urls` in order.
    ///
    /// Only batch-level failures are returned as errors: a muxer that can not run,
    /// an unusable scratch or output directory, or a scratch directory that can not
    /// be cleared. Job failures are part of the report.
    pub async fn run<I, S>(&self, urls: I) -> M3u8DlResult<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = self.downloader.config();
        let scratch = self.downloader.scratch();

        self.downloader.muxer().ensure_available().await?;
        scratch.ensure().await?;
        // leftovers of an interrupted run must never be finalized
        scratch.clear().await?;
        tokio::fs::create_dir_all(&config.output_dir).await?;

        let mut report = BatchReport::default();
        for url in urls {
            let url = url.as_ref();
            log::info!("Downloading {url}");

            let outcome = self.downloader.download(url).await;
            match &outcome {
                JobOutcome::Finalized { path, .. } => {
                    log::debug!("{url} saved to {}", path.display())
                }
                JobOutcome::NoOutput => log::warn!("{url} produced no output."),
                JobOutcome::Failed { stage, error } => {
                    log::error!("Failed to download {url} after {stage}: {error}")
                }
            }
            report.jobs.push(JobReport {
                url: url.to_string(),
                outcome,
            });

            self.job_pacer.pace().await;
            scratch.clear().await?;
        }

        log::info!(
            "Batch finished: {} finalized, {} without output, {} failed.",
            report.finalized(),
            report.skipped(),
            report.failed()
        );
        Ok(report)
    }
}
