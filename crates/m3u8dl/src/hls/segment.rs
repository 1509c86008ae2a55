use std::{fmt, sync::Arc};

use crate::hls::manifest::extract_segment_lines;

/// Predicate deciding which non-directive playlist lines are media segments.
#[derive(Clone)]
pub struct SegmentFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl SegmentFilter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Accept lines containing `marker`, e.g. `segmentNo`.
    pub fn marker(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        Self::new(move |line| line.contains(&marker))
    }

    /// Accept every non-directive line.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, line: &str) -> bool {
        (self.0)(line)
    }
}

impl From<Option<String>> for SegmentFilter {
    fn from(marker: Option<String>) -> Self {
        match marker {
            Some(marker) => Self::marker(marker),
            None => Self::any(),
        }
    }
}

impl fmt::Debug for SegmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SegmentFilter").finish_non_exhaustive()
    }
}

/// Ordered segment references of a playlist.
#[derive(Debug, Clone)]
pub struct SegmentExtractor {
    filter: SegmentFilter,
}

impl SegmentExtractor {
    pub fn new(filter: SegmentFilter) -> Self {
        Self { filter }
    }

    pub fn extract<'a>(&self, manifest: &'a str) -> Vec<&'a str> {
        extract_segment_lines(manifest, |line| self.filter.matches(line))
    }
}
