use std::{fmt, str::FromStr, sync::LazyLock, time::Duration};

use regex::Regex;

use crate::error::{M3u8DlError, M3u8DlResult};

const EXT_X_KEY: &str = "#EXT-X-KEY";
const EXTINF: &str = "#EXTINF:";

static KEY_INFO_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^#EXT-X-KEY:METHOD=([A-Za-z0-9-]+),URI="([^"]+)",IV=([^\s,]+)"#).unwrap()
});

static KEY_METHOD_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^#EXT-X-KEY:(?:.*,)?METHOD=([^,\s]+)"#).unwrap());

// Only AES-128 with a `0x` prefixed hexadecimal IV is located.
static AES128_KEY_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(#EXT-X-KEY:METHOD=AES-128,URI=")([^"]+)(",IV=0[xX][0-9A-Fa-f]+)"#).unwrap()
});

/// > The methods defined are: NONE, AES-128, and SAMPLE-AES.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMethod {
    None,
    Aes128,
    SampleAes,
}

impl EncryptionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Aes128 => "AES-128",
            Self::SampleAes => "SAMPLE-AES",
        }
    }
}

impl FromStr for EncryptionMethod {
    type Err = M3u8DlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "AES-128" => Ok(Self::Aes128),
            "SAMPLE-AES" => Ok(Self::SampleAes),
            _ => Err(M3u8DlError::ManifestParse(format!(
                "unknown encryption method: {s}"
            ))),
        }
    }
}

impl fmt::Display for EncryptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of an `#EXT-X-KEY` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub method: EncryptionMethod,
    pub uri: String,
    pub iv: String,
}

impl fmt::Display for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{EXT_X_KEY}:METHOD={},URI=\"{}\",IV={}",
            self.method, self.uri, self.iv
        )
    }
}

/// Parse a single `#EXT-X-KEY:METHOD=<method>,URI="<uri>",IV=<iv>` line.
///
/// Lines that do not follow this grammar, including key tags with an unknown
/// method, yield `None`.
pub fn parse_key_info(line: &str) -> Option<KeyInfo> {
    let captures = KEY_INFO_REGEXP.captures(line)?;
    let method = captures[1].parse().ok()?;

    Some(KeyInfo {
        method,
        uri: captures[2].to_string(),
        iv: captures[3].to_string(),
    })
}

/// Whether the first key tag of the manifest declares a method other than `NONE`.
///
/// Only the `METHOD` attribute is inspected, so a key tag this crate can not
/// locate a key for still counts as encrypted.
pub fn is_encrypted(manifest: &str) -> bool {
    let Some(line) = manifest.lines().find(|line| line.starts_with(EXT_X_KEY)) else {
        return false;
    };

    KEY_METHOD_REGEXP
        .captures(line)
        .map(|captures| &captures[1] != EncryptionMethod::None.as_str())
        .unwrap_or(true)
}

/// Find the key URI of the first AES-128 key tag carrying a hexadecimal IV.
pub fn extract_key_uri(manifest: &str) -> Option<&str> {
    AES128_KEY_REGEXP
        .captures(manifest)
        .and_then(|captures| captures.get(2))
        .map(|uri| uri.as_str())
}

/// Replace the URI of the key tag located by [extract_key_uri].
///
/// Everything outside of the quoted URI, line endings included, is kept as is.
/// A manifest without such a key tag is returned unchanged.
pub fn rewrite_key_uri(manifest: &str, new_uri: &str) -> String {
    let Some(uri) = AES128_KEY_REGEXP
        .captures(manifest)
        .and_then(|captures| captures.get(2))
    else {
        return manifest.to_string();
    };

    let mut rewritten = String::with_capacity(manifest.len() - uri.len() + new_uri.len());
    rewritten.push_str(&manifest[..uri.start()]);
    rewritten.push_str(new_uri);
    rewritten.push_str(&manifest[uri.end()..]);
    rewritten
}

/// Sum every `#EXTINF` duration, truncated to whole seconds.
pub fn extract_play_duration(manifest: &str) -> M3u8DlResult<Duration> {
    let mut total = 0f64;

    for line in manifest.lines() {
        let Some(value) = line.strip_prefix(EXTINF) else {
            continue;
        };
        let value = value.split(',').next().unwrap_or_default().trim();
        let duration: f64 = value.parse().map_err(|_| {
            M3u8DlError::ManifestParse(format!("invalid #EXTINF duration: {line}"))
        })?;
        if !duration.is_finite() || duration < 0. {
            return Err(M3u8DlError::ManifestParse(format!(
                "invalid #EXTINF duration: {line}"
            )));
        }
        total += duration;
    }

    Ok(Duration::from_secs(total as u64))
}

/// Non-directive lines accepted by `is_segment`, in manifest order.
pub fn extract_segment_lines<F>(manifest: &str, is_segment: F) -> Vec<&str>
where
    F: Fn(&str) -> bool,
{
    manifest
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| is_segment(line))
        .collect()
}
