//! Release/asset model and metadata decode.
//!
//! The remote feed is the GitHub releases JSON for a repository: an array of
//! releases, each with a tag, a publish timestamp, and asset records carrying
//! a name, a byte size, and a download URL. Decoding either yields the full
//! collection or fails; there are no partial results. Build attributes are
//! derived from each asset name once, at ingest.

use serde::Deserialize;

use crate::attrs::{self, AttributeSet};

/// One downloadable file attached to a release. Immutable after ingest.
#[derive(Debug, Clone)]
pub struct Asset {
    /// File name, unique within its release.
    pub name: String,
    /// Declared size in bytes (0 when the feed did not provide one).
    pub size: u64,
    /// Direct download URL.
    pub url: String,
    /// Attributes parsed from `name` at ingest; never recomputed.
    pub attrs: AttributeSet,
}

/// One tagged, timestamped group of assets, in feed order.
#[derive(Debug, Clone)]
pub struct Release {
    pub tag: String,
    /// RFC 3339 timestamp string, display-only.
    pub published_at: String,
    pub assets: Vec<Asset>,
}

impl Release {
    /// Display label in the form `tag  (YYYY-MM-DD)`.
    pub fn label(&self) -> String {
        let date = self.published_at.get(..10).unwrap_or("");
        format!("{}  ({})", self.tag, date)
    }
}

/// Malformed metadata payload. Decoding is all-or-nothing.
#[derive(Debug, thiserror::Error)]
#[error("malformed release metadata: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

#[derive(Debug, Deserialize)]
struct RawRelease {
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    assets: Vec<RawAsset>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    browser_download_url: String,
}

/// Decodes a releases payload into the model. Releases without a tag and
/// assets without a name are dropped; everything else is kept in feed order,
/// with attributes derived per asset.
pub fn decode_releases(payload: &[u8]) -> Result<Vec<Release>, DecodeError> {
    let raw: Vec<RawRelease> = serde_json::from_slice(payload)?;

    let releases = raw
        .into_iter()
        .filter(|r| !r.tag_name.is_empty())
        .map(|r| Release {
            tag: r.tag_name,
            published_at: r.published_at,
            assets: r
                .assets
                .into_iter()
                .filter(|a| !a.name.is_empty())
                .map(|a| Asset {
                    attrs: attrs::parse(&a.name),
                    name: a.name,
                    size: a.size,
                    url: a.browser_download_url,
                })
                .collect(),
        })
        .collect();

    Ok(releases)
}
