use crate::UrlError;
use url::Url;

/// Turns a raw seed cell into a crawlable URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Assume `https://` when the cell carries no scheme (`example.com`)
/// 3. Parse the URL; reject if malformed
/// 4. Only HTTP and HTTPS are accepted
/// 5. A host is required
/// 6. Remove fragment (everything after #)
///
/// # Examples
///
/// ```
/// use site_sift::url::normalize_seed;
///
/// let url = normalize_seed("  Example.com/contact#team ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/contact");
/// ```
pub fn normalize_seed(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty seed".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}
