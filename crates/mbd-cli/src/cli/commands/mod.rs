mod assets;
mod download;
mod releases;

pub use assets::run_assets;
pub use download::run_download;
pub use releases::run_releases;

use anyhow::{Context, Result};

use mbd_core::config::MbdConfig;
use mbd_core::release::decode_releases;
use mbd_core::session::Session;
use mbd_core::{fetch, release::Asset};

/// Fetches the feed on a blocking worker and swaps the session's release
/// collection wholesale.
pub(crate) async fn refresh(session: &mut Session, cfg: &MbdConfig) -> Result<()> {
    let fetch_cfg = cfg.clone();
    let payload = tokio::task::spawn_blocking(move || fetch::fetch_releases(&fetch_cfg))
        .await
        .context("fetch worker failed")?
        .context("network error while fetching releases")?;
    let releases = decode_releases(&payload).context("could not decode release metadata")?;
    tracing::info!(count = releases.len(), "releases loaded");
    session.replace_releases(releases);
    Ok(())
}

/// Human-readable byte count (`1.4 GiB` style) for asset listings.
pub(crate) fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

/// One line per asset: filtered position, size, name.
pub(crate) fn print_asset_row(position: usize, asset: &Asset) {
    println!("{:>3}  {:>10}  {}", position, human_size(asset.size), asset.name);
}
