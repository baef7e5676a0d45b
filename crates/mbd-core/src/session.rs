//! Application state: the current release collection and filter engine.
//!
//! Owned by the caller and passed into components explicitly; there is no
//! process-wide shared state. A successful metadata refresh replaces the
//! whole collection; the filter selection survives refreshes.

use crate::filter::FilterEngine;
use crate::release::Release;

#[derive(Debug, Default)]
pub struct Session {
    releases: Vec<Release>,
    pub filter: FilterEngine,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the release collection wholesale. The previous collection is
    /// discarded, never merged; the filter selection is untouched.
    pub fn replace_releases(&mut self, releases: Vec<Release>) {
        self.releases = releases;
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn release_by_tag(&self, tag: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.tag == tag)
    }

    /// Most recently published release (feed order: first entry).
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.first()
    }

    /// Filtered view of a release's assets under the current selection.
    pub fn filtered_assets<'a>(&self, release: &'a Release) -> Vec<(usize, &'a crate::release::Asset)> {
        self.filter
            .apply(&release.assets)
            .into_iter()
            .map(|i| (i, &release.assets[i]))
            .collect()
    }
}
