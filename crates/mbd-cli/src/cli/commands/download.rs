//! `mbd download` – run one download (and optional extraction) pipeline,
//! draining its events as the single consumer.

use std::io::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use mbd_core::cancel::CancelToken;
use mbd_core::config::MbdConfig;
use mbd_core::events::{ExtractOutcome, PipelineEvent, TransferOutcome};
use mbd_core::filter::FilterSelection;
use mbd_core::pipeline::{self, DownloadRequest};
use mbd_core::release::Asset;
use mbd_core::session::Session;

use super::refresh;

pub async fn run_download(
    cfg: &MbdConfig,
    tag: &str,
    asset_selector: &str,
    dir: PathBuf,
    extract: bool,
    selection: FilterSelection,
) -> Result<()> {
    let mut session = Session::new();
    refresh(&mut session, cfg).await?;
    session.filter.set_selection(selection);

    let release = match session.release_by_tag(tag) {
        Some(r) => r,
        None => bail!("no release tagged {tag:?}"),
    };
    let rows = session.filtered_assets(release);
    let asset = resolve_asset(&rows, &release.assets, asset_selector)?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create destination directory {}", dir.display()))?;
    let request = DownloadRequest {
        asset_name: asset.name.clone(),
        url: asset.url.clone(),
        dest_dir: dir,
        extract,
    };
    println!("downloading {} -> {}", asset.name, request.output_path().display());

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let cancel = CancelToken::new();
    let handle = pipeline::start(request, cfg.clone(), cancel.clone(), tx);

    // Ctrl-C sets the shared token; the transfer aborts at its next
    // progress poll. A running extraction is not interruptible.
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ncancel requested, stopping transfer...");
            signal_cancel.cancel();
        }
    });

    let mut download_outcome: Option<TransferOutcome> = None;
    let mut extract_outcome: Option<ExtractOutcome> = None;
    let mut progress = ProgressLine::new();

    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::DownloadStarted { .. } => {}
            PipelineEvent::DownloadProgress { percent } => {
                progress.update(&format!("downloading {percent:3.0}%"));
            }
            PipelineEvent::DownloadFinished { outcome } => {
                progress.clear();
                println!("download {outcome}");
                download_outcome = Some(outcome);
            }
            PipelineEvent::ExtractStarted { total } => match total {
                Some(total) => println!("extracting {total} entries..."),
                None => println!("extracting (entry count unknown)..."),
            },
            PipelineEvent::ExtractProgress { done, total } => match total {
                Some(total) if total > 0 => {
                    progress.update(&format!(
                        "extracting {done}/{total} ({:3.0}%)",
                        done as f64 / total as f64 * 100.0
                    ));
                }
                _ => progress.update(&format!("extracting, {done} entries done")),
            },
            PipelineEvent::ExtractFinished { outcome } => {
                progress.clear();
                println!("extract {outcome}");
                extract_outcome = Some(outcome);
            }
        }
    }
    tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("pipeline worker failed")?;

    match download_outcome {
        Some(TransferOutcome::Completed) => {}
        Some(outcome) => bail!("download {outcome}"),
        None => bail!("pipeline ended without a download outcome"),
    }
    if extract {
        match extract_outcome {
            Some(ExtractOutcome::Completed) => {}
            Some(outcome) => bail!("extract {outcome}"),
            None => bail!("pipeline ended without an extraction outcome"),
        }
    }
    Ok(())
}

/// Resolves the user's selector: a 1-based position in the filtered listing,
/// or an exact asset file name anywhere in the release.
fn resolve_asset<'a>(
    rows: &[(usize, &'a Asset)],
    all_assets: &'a [Asset],
    selector: &str,
) -> Result<&'a Asset> {
    if let Ok(position) = selector.parse::<usize>() {
        if position == 0 || position > rows.len() {
            bail!(
                "index {position} is out of range: the filtered listing has {} asset(s)",
                rows.len()
            );
        }
        return Ok(rows[position - 1].1);
    }
    match all_assets.iter().find(|a| a.name == selector) {
        Some(asset) => Ok(asset),
        None => bail!("no asset named {selector:?} in this release"),
    }
}

/// Single-line progress rendering on stderr, throttled so event bursts do
/// not flood the terminal.
struct ProgressLine {
    last_print: Instant,
    dirty: bool,
}

impl ProgressLine {
    fn new() -> Self {
        Self {
            last_print: Instant::now() - Duration::from_secs(1),
            dirty: false,
        }
    }

    fn update(&mut self, line: &str) {
        if self.last_print.elapsed() < Duration::from_millis(200) {
            return;
        }
        eprint!("\r{line:<60}");
        let _ = std::io::stderr().flush();
        self.last_print = Instant::now();
        self.dirty = true;
    }

    fn clear(&mut self) {
        if self.dirty {
            eprint!("\r{:<60}\r", "");
            let _ = std::io::stderr().flush();
            self.dirty = false;
        }
    }
}
