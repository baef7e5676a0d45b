//! `mbd assets` – list a release's assets under the current filters.

use anyhow::{bail, Result};

use mbd_core::config::MbdConfig;
use mbd_core::filter::FilterSelection;
use mbd_core::session::Session;

use super::{print_asset_row, refresh};

pub async fn run_assets(
    cfg: &MbdConfig,
    tag: Option<String>,
    selection: FilterSelection,
) -> Result<()> {
    let mut session = Session::new();
    refresh(&mut session, cfg).await?;
    session.filter.set_selection(selection);

    let release = match &tag {
        Some(tag) => match session.release_by_tag(tag) {
            Some(r) => r,
            None => bail!("no release tagged {tag:?}"),
        },
        None => match session.latest_release() {
            Some(r) => r,
            None => bail!("no releases found"),
        },
    };

    println!("{}", release.label());
    let rows = session.filtered_assets(release);
    if rows.is_empty() {
        println!("  no assets match the current filters");
        return Ok(());
    }
    for (position, (_, asset)) in rows.into_iter().enumerate() {
        print_asset_row(position + 1, asset);
    }
    Ok(())
}
