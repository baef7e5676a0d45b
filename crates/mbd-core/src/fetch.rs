//! Metadata fetch: GET the releases feed, full body into memory.

use std::time::Duration;

use curl::easy::Easy;

use crate::config::MbdConfig;

/// Transport/HTTP failure while retrieving metadata. A server error is not
/// distinguished from a network one beyond the status code.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] curl::Error),
    #[error("server returned HTTP {0}")]
    Http(u32),
}

/// Fetches the configured releases feed and returns the raw response body.
/// Decoding is a separate step (`release::decode_releases`).
pub fn fetch_releases(cfg: &MbdConfig) -> Result<Vec<u8>, FetchError> {
    fetch_bytes(&cfg.releases_url, cfg)
}

/// GET `url`, collecting the whole response body. Follows redirects, sends
/// the configured user agent, fails on a non-2xx final status.
pub fn fetch_bytes(url: &str, cfg: &MbdConfig) -> Result<Vec<u8>, FetchError> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.useragent(&cfg.user_agent)?;
    easy.follow_location(true)?;
    easy.max_redirections(cfg.redirect_limit())?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;

    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        tracing::warn!(url, code, "metadata fetch rejected");
        return Err(FetchError::Http(code));
    }

    tracing::debug!(url, bytes = body.len(), "metadata fetched");
    Ok(body)
}
