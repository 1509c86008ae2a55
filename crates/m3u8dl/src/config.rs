use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{hls::SegmentFilter, mux::MuxFailurePolicy};

pub const DEFAULT_SEGMENT_MARKER: &str = "segmentNo";

/// Settings of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Working directory shared by all jobs, cleared between them.
    pub scratch_dir: PathBuf,
    /// Where finalized files are moved to.
    pub output_dir: PathBuf,

    pub manifest_filename: String,
    pub output_filename: String,
    pub output_extension: String,

    /// Delay after every segment.
    #[serde(with = "duration_secs")]
    pub segment_interval: Duration,
    /// Delay after every job.
    #[serde(with = "duration_secs")]
    pub job_interval: Duration,
    /// HTTP timeout of each request.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,

    /// Substring marking segment lines. Every non-directive line is a segment when unset.
    pub segment_marker: Option<String>,

    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,

    pub mux_failure: MuxFailurePolicy,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("_tmp"),
            output_dir: PathBuf::from("."),
            manifest_filename: "index.m3u8".to_string(),
            output_filename: "out.ts".to_string(),
            output_extension: "ts".to_string(),
            segment_interval: Duration::from_secs(5),
            job_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
            segment_marker: Some(DEFAULT_SEGMENT_MARKER.to_string()),
            headers: BTreeMap::new(),
            mux_failure: MuxFailurePolicy::default(),
        }
    }
}

impl DownloadConfig {
    pub fn segment_filter(&self) -> SegmentFilter {
        SegmentFilter::from(self.segment_marker.clone())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
