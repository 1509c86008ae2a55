mod batch;
mod job;
mod sequencial;

pub use batch::{parse_batch, BatchDownloader};
pub use job::{BatchReport, JobOutcome, JobReport, JobState};
pub use sequencial::SequencialDownloader;
