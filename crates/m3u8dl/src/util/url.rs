use url::{Host, Url};

/// Split a URL or path at its last `/`. The separator stays on the base.
pub fn extract_path_and_filename(url: &str) -> (&str, &str) {
    match url.rfind('/') {
        Some(index) => url.split_at(index + 1),
        None => ("", url),
    }
}

/// `scheme://authority` of the URL.
pub fn base_url_of(url: &Url) -> String {
    let mut base = format!("{}://", url.scheme());
    if !url.username().is_empty() {
        base.push_str(url.username());
        if let Some(password) = url.password() {
            base.push(':');
            base.push_str(password);
        }
        base.push('@');
    }
    base.push_str(url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        base.push_str(&format!(":{port}"));
    }
    base
}

/// Directory of the URL, against which sibling resources are resolved.
pub fn directory_of(url: &Url) -> Url {
    let mut directory = url.clone();
    directory.set_query(None);
    directory.set_fragment(None);
    if let Ok(mut segments) = directory.path_segments_mut() {
        segments.pop();
        segments.push("");
    }
    directory
}

/// First label of the host when the host has a subdomain, e.g. `abc` of `abc.example.com`.
pub fn extract_subdomain(url: &Url) -> &str {
    let Some(Host::Domain(host)) = url.host() else {
        return "";
    };

    let labels: Vec<_> = host.split('.').collect();
    if labels.len() < 3 {
        return "";
    }
    labels[0]
}
