use std::{fmt, path::PathBuf};

use crate::error::M3u8DlError;

/// Progress of a single download job. Each state is reached only after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JobState {
    Idle,
    ManifestFetched,
    KeyResolved,
    KeyFetched,
    SegmentsFetched,
    Muxed,
    Finalized,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::ManifestFetched => "manifest fetched",
            Self::KeyResolved => "key resolved",
            Self::KeyFetched => "key fetched",
            Self::SegmentsFetched => "segments fetched",
            Self::Muxed => "muxed",
            Self::Finalized => "finalized",
        })
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    /// The muxed file was moved to the output directory under its content digest.
    Finalized { path: PathBuf, digest: String },
    /// The muxer left no output file behind.
    NoOutput,
    /// The job stopped after reaching `stage`.
    Failed {
        stage: JobState,
        error: M3u8DlError,
    },
}

impl JobOutcome {
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug)]
pub struct JobReport {
    pub url: String,
    pub outcome: JobOutcome,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn finalized(&self) -> usize {
        self.jobs.iter().filter(|j| j.outcome.is_finalized()).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.iter().filter(|j| j.outcome.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.jobs.len() - self.finalized() - self.failed()
    }
}
