//! Progress/outcome events posted by pipeline workers to the one consumer.
//!
//! Events from a single operation are produced (and therefore delivered) in
//! order; nothing is shared with the consumer except through this channel.

use std::fmt;

use crate::extract::ExtractError;
use crate::transfer::TransferError;

/// Terminal outcome of one transfer, in consumer-renderable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

impl TransferOutcome {
    pub fn from_result(result: &Result<(), TransferError>) -> Self {
        match result {
            Ok(()) => TransferOutcome::Completed,
            Err(TransferError::Cancelled) => TransferOutcome::Cancelled,
            Err(e) => TransferOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Completed)
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Completed => f.write_str("complete"),
            TransferOutcome::Cancelled => f.write_str("cancelled"),
            TransferOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Terminal outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Completed,
    Failed(String),
}

impl ExtractOutcome {
    pub fn from_result(result: &Result<(), ExtractError>) -> Self {
        match result {
            Ok(()) => ExtractOutcome::Completed,
            Err(e) => ExtractOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractOutcome::Completed)
    }
}

impl fmt::Display for ExtractOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractOutcome::Completed => f.write_str("complete"),
            ExtractOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Everything a pipeline worker tells the consumer.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    DownloadStarted {
        name: String,
    },
    /// Percentage in `[0, 100]`; only sent when the total size is known.
    DownloadProgress {
        percent: f64,
    },
    DownloadFinished {
        outcome: TransferOutcome,
    },
    /// `total` is `None` when the count pass failed (indeterminate).
    ExtractStarted {
        total: Option<u64>,
    },
    ExtractProgress {
        done: u64,
        total: Option<u64>,
    },
    ExtractFinished {
        outcome: ExtractOutcome,
    },
}
