use crate::{UrlError, UrlResult};
use url::Url;

/// Validates a caller-supplied thread URL
///
/// The URL must be non-empty, parse as an absolute URL, use HTTP or HTTPS,
/// and name a host. The returned string is the trimmed input, left exactly
/// as given so page suffixes are appended to what the caller wrote.
///
/// # Examples
///
/// ```
/// use thread_harvest::url::parse_base_url;
///
/// assert!(parse_base_url("https://forum.example.com/t12345").is_ok());
/// assert!(parse_base_url("").is_err());
/// assert!(parse_base_url("ftp://forum.example.com/t1").is_err());
/// ```
pub fn parse_base_url(input: &str) -> UrlResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(trimmed.to_string())
}
