use crate::{
    error::{M3u8DlError, M3u8DlResult},
    hls::manifest::{extract_key_uri, is_encrypted, rewrite_key_uri},
};

/// Key location of an encrypted playlist, rewritten to be a sibling of the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Key path relative to the directory of the playlist.
    pub relative_path: String,
    /// Playlist text referencing [ResolvedKey::relative_path].
    pub manifest: String,
}

/// Make the key of an AES-128 playlist fetchable relative to the playlist itself.
///
/// Absolute key paths are coerced into relative ones, as the key is always
/// served next to the segments.
pub fn resolve(manifest: &str) -> M3u8DlResult<ResolvedKey> {
    let uri = extract_key_uri(manifest).ok_or_else(|| {
        M3u8DlError::ManifestParse("no AES-128 key uri with hexadecimal IV found".to_string())
    })?;

    let relative_path = uri.trim_start_matches('/').to_string();
    if relative_path.is_empty() {
        return Err(M3u8DlError::ManifestParse(format!("invalid key uri: {uri}")));
    }

    let manifest = rewrite_key_uri(manifest, &relative_path);
    Ok(ResolvedKey {
        relative_path,
        manifest,
    })
}

/// Like [resolve], but passes unencrypted playlists through untouched.
pub fn resolve_if_encrypted(manifest: &str) -> M3u8DlResult<Option<ResolvedKey>> {
    if !is_encrypted(manifest) {
        return Ok(None);
    }
    resolve(manifest).map(Some)
}
