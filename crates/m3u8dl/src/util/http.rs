use std::{collections::BTreeMap, ops::Deref, str::FromStr, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, ClientBuilder,
};

use crate::error::{M3u8DlError, M3u8DlResult};

/// Shared HTTP client of one run. Static headers apply to every request it issues.
#[derive(Clone, Default)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(builder: ClientBuilder) -> M3u8DlResult<Self> {
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Client sending `headers` with every request. A `User-Agent` among them
    /// replaces `user_agent`.
    pub fn with_headers(
        headers: &BTreeMap<String, String>,
        user_agent: &str,
        timeout: Duration,
    ) -> M3u8DlResult<Self> {
        Self::new(
            Client::builder()
                .user_agent(user_agent)
                .default_headers(header_map(headers)?)
                .timeout(timeout),
        )
    }
}

impl Deref for HttpClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

pub fn header_map(headers: &BTreeMap<String, String>) -> M3u8DlResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_str(key.trim())
            .map_err(|_| M3u8DlError::InvalidHeader(key.to_string()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| M3u8DlError::InvalidHeader(format!("{key}: {value}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Parse a `Name: value` header line.
pub fn parse_header(header: &str) -> M3u8DlResult<(String, String)> {
    let (key, value) = header
        .split_once(':')
        .ok_or_else(|| M3u8DlError::InvalidHeader(header.to_string()))?;
    let (key, value) = (key.trim(), value.trim());
    HeaderName::from_str(key).map_err(|_| M3u8DlError::InvalidHeader(header.to_string()))?;
    HeaderValue::from_str(value).map_err(|_| M3u8DlError::InvalidHeader(header.to_string()))?;
    Ok((key.to_string(), value.to_string()))
}
