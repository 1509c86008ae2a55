use std::future::Future;

use bytes::Bytes;
use url::Url;

use crate::{
    error::{M3u8DlError, M3u8DlResult},
    util::http::HttpClient,
};

/// Retrieves remote resources. No retry happens at this layer.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = M3u8DlResult<Bytes>> + Send;
}

impl Fetcher for HttpClient {
    fn fetch(&self, url: &Url) -> impl Future<Output = M3u8DlResult<Bytes>> + Send {
        let request = self.get(url.clone());
        let url = url.to_string();
        async move {
            let response = request.send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                log::debug!("Error body of {url}: {body}");
                return Err(M3u8DlError::DownloadFailure { url, status, body });
            }

            let bytes = response.bytes().await?;
            Ok(bytes)
        }
    }
}
