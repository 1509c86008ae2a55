pub mod key;
pub mod manifest;
pub mod segment;

pub use key::{resolve, resolve_if_encrypted, ResolvedKey};
pub use manifest::{
    extract_key_uri, extract_play_duration, extract_segment_lines, is_encrypted, parse_key_info,
    rewrite_key_uri, EncryptionMethod, KeyInfo,
};
pub use segment::{SegmentExtractor, SegmentFilter};
