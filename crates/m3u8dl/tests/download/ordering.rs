use m3u8dl::{
    BatchDownloader, FfmpegMuxer, JobOutcome, JobState, M3u8DlError, MuxFailurePolicy,
};
use sha2::{Digest, Sha256};

use crate::{list_dir, test_config, ConcatMuxer, Event, EventLog, RecordingPacer, StaticFetcher};

const ENCRYPTED: &str = include_str!("../fixtures/hls/encrypted.m3u8");
const PLAIN: &str = include_str!("../fixtures/hls/plain.m3u8");

const PLAYLIST: &str = "https://host/a/index.m3u8";
const KEY: &str = "https://host/a/keys/stream.key";
const SEGMENTS: [&str; 3] = [
    "https://host/a/video/0.ts?segmentNo=0",
    "https://host/a/video/1.ts?segmentNo=1",
    "https://host/a/video/2.ts?segmentNo=2",
];

fn encrypted_fetcher(log: &EventLog) -> StaticFetcher {
    StaticFetcher::new(log.clone())
        .serve(PLAYLIST, ENCRYPTED)
        .serve(KEY, &b"0123456789abcdef"[..])
        .serve(SEGMENTS[0], &b"segment-0;"[..])
        .serve(SEGMENTS[1], &b"segment-1;"[..])
        .serve(SEGMENTS[2], &b"segment-2;"[..])
}

fn batch(
    config: m3u8dl::DownloadConfig,
    fetcher: StaticFetcher,
    muxer: ConcatMuxer,
    log: &EventLog,
) -> BatchDownloader<StaticFetcher, ConcatMuxer, RecordingPacer> {
    BatchDownloader::with_pacers(
        config,
        fetcher,
        muxer,
        RecordingPacer::new("segment", log.clone()),
        RecordingPacer::new("job", log.clone()),
    )
}

#[tokio::test]
async fn encrypted_job_runs_in_order() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let config = test_config(temp.path());
    let log = EventLog::default();
    let downloader = batch(
        config.clone(),
        encrypted_fetcher(&log),
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;

    let rewritten = ENCRYPTED.replace("\"/keys/stream.key\"", "\"keys/stream.key\"");
    assert_eq!(
        log.events(),
        vec![
            Event::Fetch(PLAYLIST.to_string()),
            Event::Fetch(KEY.to_string()),
            Event::Fetch(SEGMENTS[0].to_string()),
            Event::Pace("segment"),
            Event::Fetch(SEGMENTS[1].to_string()),
            Event::Pace("segment"),
            Event::Fetch(SEGMENTS[2].to_string()),
            Event::Pace("segment"),
            Event::Mux(rewritten),
            Event::Pace("job"),
        ]
    );

    let expected = hex::encode(Sha256::digest(b"segment-0;segment-1;segment-2;"));
    assert_eq!(report.jobs.len(), 1);
    match &report.jobs[0].outcome {
        JobOutcome::Finalized { path, digest } => {
            assert_eq!(digest, &expected);
            assert_eq!(path, &config.output_dir.join(format!("{expected}.ts")));
            assert_eq!(std::fs::read(path)?, b"segment-0;segment-1;segment-2;");
        }
        outcome => panic!("unexpected outcome: {outcome:?}"),
    }

    assert_eq!(list_dir(&config.output_dir), vec![format!("{expected}.ts")]);
    assert!(list_dir(&config.scratch_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn plain_job_skips_key() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let log = EventLog::default();
    let fetcher = StaticFetcher::new(log.clone())
        .serve(PLAYLIST, PLAIN)
        .serve("https://host/a/seg-a.ts?segmentNo=0", &b"a"[..])
        .serve("https://host/a/seg-b.ts?segmentNo=1", &b"b"[..]);
    let downloader = batch(
        test_config(temp.path()),
        fetcher,
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(report.jobs[0].outcome.is_finalized());
    assert_eq!(
        log.fetched(),
        vec![
            PLAYLIST,
            "https://host/a/seg-a.ts?segmentNo=0",
            "https://host/a/seg-b.ts?segmentNo=1"
        ]
    );
    // the playlist is handed to the muxer unchanged
    assert!(log.events().contains(&Event::Mux(PLAIN.to_string())));
    Ok(())
}

#[tokio::test]
async fn segment_failure_stops_job() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let log = EventLog::default();
    let fetcher = StaticFetcher::new(log.clone())
        .serve(PLAYLIST, ENCRYPTED)
        .serve(KEY, &b"0123456789abcdef"[..])
        .serve(SEGMENTS[0], &b"segment-0;"[..]);
    let downloader = batch(
        test_config(temp.path()),
        fetcher,
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    match &report.jobs[0].outcome {
        JobOutcome::Failed { stage, error } => {
            assert_eq!(*stage, JobState::KeyFetched);
            assert!(matches!(
                error,
                M3u8DlError::DownloadFailure { url, .. } if url == SEGMENTS[1]
            ));
        }
        outcome => panic!("unexpected outcome: {outcome:?}"),
    }

    // no later segment is requested and nothing is muxed
    assert_eq!(log.fetched(), vec![PLAYLIST, KEY, SEGMENTS[0], SEGMENTS[1]]);
    assert!(!log.events().iter().any(|e| matches!(e, Event::Mux(_))));
    assert_eq!(log.events().last(), Some(&Event::Pace("job")));
    Ok(())
}

#[tokio::test]
async fn invalid_url_fails_before_fetching() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let log = EventLog::default();
    let downloader = batch(
        test_config(temp.path()),
        StaticFetcher::new(log.clone()),
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run(["not a url"]).await?;
    assert!(matches!(
        report.jobs[0].outcome,
        JobOutcome::Failed {
            stage: JobState::Idle,
            error: M3u8DlError::UrlParseError(_)
        }
    ));
    assert!(log.fetched().is_empty());
    Ok(())
}

#[tokio::test]
async fn unsupported_encryption_fails() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let log = EventLog::default();
    let manifest = ENCRYPTED.replace("METHOD=AES-128", "METHOD=SAMPLE-AES");
    let fetcher = StaticFetcher::new(log.clone()).serve(PLAYLIST, manifest);
    let downloader = batch(
        test_config(temp.path()),
        fetcher,
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(matches!(
        report.jobs[0].outcome,
        JobOutcome::Failed {
            stage: JobState::ManifestFetched,
            error: M3u8DlError::ManifestParse(_)
        }
    ));
    assert_eq!(log.fetched(), vec![PLAYLIST]);
    Ok(())
}

#[tokio::test]
async fn key_without_iv_fails() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let log = EventLog::default();
    let manifest = ENCRYPTED.replace(",IV=0x0000000000000000000000000000000f", "");
    let fetcher = StaticFetcher::new(log.clone())
        .serve(PLAYLIST, manifest)
        .serve(KEY, &b"0123456789abcdef"[..])
        .serve(SEGMENTS[0], &b"segment-0;"[..]);
    let downloader = batch(
        test_config(temp.path()),
        fetcher,
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(matches!(
        report.jobs[0].outcome,
        JobOutcome::Failed {
            stage: JobState::ManifestFetched,
            error: M3u8DlError::ManifestParse(_)
        }
    ));
    assert_eq!(log.fetched(), vec![PLAYLIST]);
    assert!(!log.events().contains(&Event::Pace("segment")));
    Ok(())
}

#[tokio::test]
async fn missing_muxer_aborts_batch() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let log = EventLog::default();
    let downloader = BatchDownloader::with_pacers(
        test_config(temp.path()),
        encrypted_fetcher(&log),
        FfmpegMuxer::with_program("m3u8dl-missing-muxer"),
        RecordingPacer::new("segment", log.clone()),
        RecordingPacer::new("job", log.clone()),
    );

    let result = downloader.run([PLAYLIST, PLAYLIST]).await;
    assert!(matches!(result, Err(M3u8DlError::MissingExecutable(_))));
    assert!(log.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn strict_policy_fails_on_muxer_error() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let config = m3u8dl::DownloadConfig {
        mux_failure: MuxFailurePolicy::Strict,
        ..test_config(temp.path())
    };
    let log = EventLog::default();
    let downloader = batch(
        config.clone(),
        encrypted_fetcher(&log),
        ConcatMuxer::new(log.clone()).exit_code(1),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(matches!(
        report.jobs[0].outcome,
        JobOutcome::Failed {
            stage: JobState::SegmentsFetched,
            error: M3u8DlError::MuxerFailure { code: Some(1), .. }
        }
    ));
    assert!(list_dir(&config.output_dir).is_empty());
    assert!(list_dir(&config.scratch_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn optimistic_policy_keeps_muxer_output() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let config = test_config(temp.path());
    let log = EventLog::default();
    let downloader = batch(
        config.clone(),
        encrypted_fetcher(&log),
        ConcatMuxer::new(log.clone()).exit_code(1),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(report.jobs[0].outcome.is_finalized());
    assert_eq!(list_dir(&config.output_dir).len(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_output_is_skipped() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let config = test_config(temp.path());
    let log = EventLog::default();
    let downloader = batch(
        config.clone(),
        encrypted_fetcher(&log),
        ConcatMuxer::new(log.clone()).exit_code(1).without_output(),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(matches!(report.jobs[0].outcome, JobOutcome::NoOutput));
    assert_eq!(report.skipped(), 1);
    assert!(list_dir(&config.output_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn leftovers_are_cleared_before_first_job() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let config = test_config(temp.path());
    std::fs::create_dir_all(&config.scratch_dir)?;
    std::fs::write(config.scratch_dir.join("out.ts"), b"stale")?;

    let log = EventLog::default();
    let fetcher = StaticFetcher::new(log.clone()).serve(PLAYLIST, ENCRYPTED);
    let downloader = batch(
        config.clone(),
        fetcher,
        ConcatMuxer::new(log.clone()),
        &log,
    );

    let report = downloader.run([PLAYLIST]).await?;
    assert!(report.jobs[0].outcome.is_failed());
    assert!(list_dir(&config.output_dir).is_empty());
    assert!(list_dir(&config.scratch_dir).is_empty());
    Ok(())
}
