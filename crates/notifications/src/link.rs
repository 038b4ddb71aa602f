use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("site url must start with http:// or https://: {0}")]
    InvalidSiteUrl(String),
}

/// Link to a page of the app, absolute when a site URL is configured.
///
/// `path` is joined to `site_url` with exactly one slash. Without a site URL
/// the path is returned as-is.
pub fn booking_link(site_url: Option<&str>, path: &str) -> Result<String, LinkError> {
    let Some(base) = site_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(path.to_string());
    };
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(LinkError::InvalidSiteUrl(base.to_string()));
    }
    Ok(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}
