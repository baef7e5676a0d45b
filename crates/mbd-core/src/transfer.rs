//! Streaming download of one asset to a destination file.
//!
//! Response bytes go straight to disk as they arrive; nothing is buffered
//! whole. The cancellation token is polled at each progress tick, and a set
//! token aborts the transfer at the next poll. The partially written
//! destination file is left on disk after a cancel or failure.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use curl::easy::Easy;

use crate::cancel::CancelToken;
use crate::config::MbdConfig;

/// Terminal outcome causes for one transfer. Cancellation is its own
/// variant, distinct from genuine I/O and network failures.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to open destination file: {0}")]
    Open(#[source] std::io::Error),
    #[error("failed to write destination file: {0}")]
    Write(#[source] std::io::Error),
    #[error("network error: {0}")]
    Network(#[from] curl::Error),
    #[error("server returned HTTP {0}")]
    Http(u32),
    #[error("transfer cancelled")]
    Cancelled,
}

/// Downloads `url` to `destination`, truncating any existing file.
///
/// `on_progress` receives a percentage in `[0, 100]` whenever the total size
/// is known; with an unknown total no percentage is reported and the caller
/// should treat progress as indeterminate. Values are non-decreasing within
/// one call.
pub fn transfer<F>(
    url: &str,
    destination: &Path,
    cfg: &MbdConfig,
    cancel: &CancelToken,
    mut on_progress: F,
) -> Result<(), TransferError>
where
    F: FnMut(f64),
{
    let mut file = File::create(destination).map_err(TransferError::Open)?;

    let mut easy = Easy::new();
    easy.url(url)?;
    easy.useragent(&cfg.user_agent)?;
    easy.follow_location(true)?;
    easy.max_redirections(cfg.redirect_limit())?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
    easy.progress(true)?;

    let mut write_err: Option<std::io::Error> = None;
    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                tracing::warn!("destination write failed: {}", e);
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.progress_function(|dltotal, dlnow, _ultotal, _ulnow| {
            if cancel.is_cancelled() {
                return false; // abort at this poll
            }
            if dltotal > 0.0 {
                on_progress((dlnow / dltotal * 100.0).min(100.0));
            }
            true
        })?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if cancel.is_cancelled() {
            tracing::info!(url, "transfer cancelled, partial file left at {}", destination.display());
            return Err(TransferError::Cancelled);
        }
        if let Some(io_err) = write_err {
            return Err(TransferError::Write(io_err));
        }
        return Err(TransferError::Network(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }

    file.flush().map_err(TransferError::Write)?;
    tracing::debug!(url, dest = %destination.display(), "transfer complete");
    Ok(())
}
