//! `mbd releases` – fetch and list available releases.

use anyhow::Result;

use mbd_core::config::MbdConfig;
use mbd_core::session::Session;

use super::refresh;

pub async fn run_releases(cfg: &MbdConfig, limit: usize) -> Result<()> {
    let mut session = Session::new();
    refresh(&mut session, cfg).await?;

    if session.releases().is_empty() {
        println!("No releases found.");
        return Ok(());
    }

    for release in session.releases().iter().take(limit) {
        println!("{}", release.label());
    }
    let hidden = session.releases().len().saturating_sub(limit);
    if hidden > 0 {
        println!("... and {hidden} more (raise --limit to see them)");
    }
    Ok(())
}
