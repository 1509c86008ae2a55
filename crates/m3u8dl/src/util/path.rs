use std::path::{Component, Path, PathBuf};

use crate::error::{M3u8DlError, M3u8DlResult};

/// Local path of a playlist reference inside the scratch directory.
///
/// The directory structure of the reference is preserved and a leading
/// separator is dropped. References escaping the scratch directory are rejected.
pub fn scratch_relative_path(reference: &str) -> M3u8DlResult<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(reference).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(M3u8DlError::ManifestParse(format!(
                    "reference escapes the scratch directory: {reference}"
                )))
            }
        }
    }

    if path.as_os_str().is_empty() {
        return Err(M3u8DlError::ManifestParse(format!(
            "empty local path for reference: {reference:?}"
        )));
    }
    Ok(path)
}
