use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::error::M3u8DlResult;

const BLOCK_SIZE: usize = 4096;

pub type ContentDigest = [u8; 32];

/// SHA-256 of the file, read block by block.
pub async fn digest_of<P: AsRef<Path>>(path: P) -> M3u8DlResult<ContentDigest> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hasher.finalize().into())
}

/// `<hex digest>.<extension>`
pub fn content_file_name(digest: &ContentDigest, extension: &str) -> String {
    let digest = hex::encode(digest);
    if extension.is_empty() {
        digest
    } else {
        format!("{digest}.{extension}")
    }
}
