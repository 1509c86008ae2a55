use std::path::{Path, PathBuf};

use crate::error::{M3u8DlError, M3u8DlResult};

/// Working directory reused by every job of a batch.
///
/// Only one job owns it at a time. It is cleared, never removed, between jobs.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root.join(path)
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure(&self) -> M3u8DlResult<()> {
        match tokio::fs::metadata(&self.root).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(M3u8DlError::ScratchDir(self.root.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&self.root).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every file and subdirectory, keeping the directory itself.
    pub async fn clear(&self) -> M3u8DlResult<()> {
        let is_dir = tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or_default();
        if !is_dir {
            return Err(M3u8DlError::ScratchDir(self.root.clone()));
        }

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    /// Write `data` to `relative`, creating missing parent directories.
    pub async fn save<P: AsRef<Path>>(&self, relative: P, data: &[u8]) -> M3u8DlResult<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}

/// Move a file, copying it when a plain rename is not possible (e.g. across devices).
pub async fn move_file<P, Q>(from: P, to: Q) -> M3u8DlResult<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (from, to) = (from.as_ref(), to.as_ref());
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    log::debug!(
        "Rename {} -> {} failed, copying instead.",
        from.display(),
        to.display()
    );
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await?;
    Ok(())
}
