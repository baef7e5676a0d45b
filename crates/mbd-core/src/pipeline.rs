//! Pipeline orchestration: download, then optional count + extract.
//!
//! One worker thread per user-initiated operation; the consumer never blocks
//! on it and only reacts to events from the channel. Extraction starts only
//! after transfer success has been confirmed in-line by the worker itself.
//! The caller is responsible for running at most one pipeline at a time.

use std::path::{Path, PathBuf};
use std::thread;

use tokio::sync::mpsc::UnboundedSender;

use crate::cancel::CancelToken;
use crate::config::MbdConfig;
use crate::events::{ExtractOutcome, PipelineEvent, TransferOutcome};
use crate::extract;
use crate::sanitize::sanitize_asset_name;
use crate::transfer;

/// One user-initiated download (with optional extraction).
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Asset file name; sanitized before joining onto `dest_dir`.
    pub asset_name: String,
    /// Direct download URL.
    pub url: String,
    /// Directory receiving the downloaded file (and the extraction
    /// subdirectory, when requested).
    pub dest_dir: PathBuf,
    /// Unpack the archive next to it after a successful download.
    pub extract: bool,
}

impl DownloadRequest {
    /// Full path of the downloaded file.
    pub fn output_path(&self) -> PathBuf {
        self.dest_dir.join(sanitize_asset_name(&self.asset_name))
    }
}

/// Join handle for a running pipeline. The orchestrator never detaches its
/// worker; callers join after the terminal event arrives.
pub struct PipelineHandle {
    worker: thread::JoinHandle<()>,
}

impl PipelineHandle {
    pub fn join(self) {
        if let Err(panic) = self.worker.join() {
            std::panic::resume_unwind(panic);
        }
    }
}

/// Extraction target: a sibling directory named after the archive with its
/// extension stripped.
pub fn extraction_dir(archive_path: &Path) -> PathBuf {
    let stem = archive_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "extracted".into());
    archive_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(stem)
}

/// Starts the pipeline on a worker thread. All progress and outcomes are
/// posted to `events`; the returned handle must be joined by the caller.
pub fn start(
    request: DownloadRequest,
    cfg: MbdConfig,
    cancel: CancelToken,
    events: UnboundedSender<PipelineEvent>,
) -> PipelineHandle {
    let worker = thread::spawn(move || run(request, cfg, cancel, events));
    PipelineHandle { worker }
}

fn run(
    request: DownloadRequest,
    cfg: MbdConfig,
    cancel: CancelToken,
    events: UnboundedSender<PipelineEvent>,
) {
    let out_path = request.output_path();
    let _ = events.send(PipelineEvent::DownloadStarted {
        name: request.asset_name.clone(),
    });

    let transfer_result = transfer::transfer(&request.url, &out_path, &cfg, &cancel, |percent| {
        let _ = events.send(PipelineEvent::DownloadProgress { percent });
    });
    let outcome = TransferOutcome::from_result(&transfer_result);
    tracing::info!(asset = %request.asset_name, %outcome, "download finished");
    let _ = events.send(PipelineEvent::DownloadFinished {
        outcome: outcome.clone(),
    });

    if !outcome.is_success() || !request.extract {
        return;
    }

    let target_dir = extraction_dir(&out_path);

    // A failed count pass is not fatal: extraction proceeds with an
    // unknown total and indeterminate progress.
    let total = match extract::count_entries(&out_path) {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("entry count failed, total unknown: {}", e);
            None
        }
    };
    let _ = events.send(PipelineEvent::ExtractStarted { total });

    let extract_result = extract::extract(&out_path, &target_dir, |done| {
        let _ = events.send(PipelineEvent::ExtractProgress { done, total });
    });
    let outcome = ExtractOutcome::from_result(&extract_result);
    tracing::info!(archive = %out_path.display(), %outcome, "extraction finished");
    let _ = events.send(PipelineEvent::ExtractFinished { outcome });
}
