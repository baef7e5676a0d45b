//! Integration tests: local HTTP server, real files, full pipeline runs.
//!
//! Covers the end-to-end flow (download then extract with event ordering),
//! cancellation mid-transfer, indeterminate progress, and fetch+decode of a
//! releases feed.

mod common;

use std::io::Write;
use std::path::Path;

use mbd_core::attrs::{Arch, ThreadModel};
use mbd_core::cancel::CancelToken;
use mbd_core::config::MbdConfig;
use mbd_core::events::{ExtractOutcome, PipelineEvent, TransferOutcome};
use mbd_core::pipeline::{self, DownloadRequest};
use mbd_core::release::decode_releases;
use mbd_core::transfer::{transfer, TransferError};
use mbd_core::{fetch, filter};

use common::http_server::{self, ServerOptions};

fn test_config() -> MbdConfig {
    MbdConfig {
        user_agent: "mbd-test/0".to_string(),
        connect_timeout_secs: 5,
        ..MbdConfig::default()
    }
}

fn write_zip_fixture(path: &Path, entries: &[(&str, &[u8])]) {
    use zip::write::SimpleFileOptions;
    let mut writer = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    for (name, data) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn transfer_downloads_body_with_monotonic_progress() {
    let body: Vec<u8> = (0u8..251).cycle().take(256 * 1024).collect();
    let url = http_server::start(body.clone());

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("asset.bin");
    let mut percents: Vec<f64> = Vec::new();

    transfer(&url, &dest, &test_config(), &CancelToken::new(), |p| {
        percents.push(p)
    })
    .expect("transfer");

    assert_eq!(std::fs::read(&dest).unwrap(), body, "byte-for-byte");
    assert!(!percents.is_empty(), "known total must produce percentages");
    assert!(
        percents.windows(2).all(|w| w[1] >= w[0]),
        "progress must be non-decreasing"
    );
    assert!(*percents.last().unwrap() > 99.99, "must culminate at 100%");
}

#[test]
fn transfer_without_content_length_reports_no_percentages() {
    let body: Vec<u8> = (0u8..97).cycle().take(64 * 1024).collect();
    let url = http_server::start_with_options(
        body.clone(),
        ServerOptions {
            content_length: false,
            ..ServerOptions::default()
        },
    );

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("asset.bin");
    let mut percents: Vec<f64> = Vec::new();

    transfer(&url, &dest, &test_config(), &CancelToken::new(), |p| {
        percents.push(p)
    })
    .expect("transfer");

    assert_eq!(std::fs::read(&dest).unwrap(), body);
    assert!(
        percents.is_empty(),
        "unknown total means indeterminate: no percentages"
    );
}

#[test]
fn cancellation_mid_transfer_stops_early_and_leaves_partial_file() {
    let body: Vec<u8> = vec![0xAB; 200 * 1024];
    let url = http_server::start_with_options(
        body.clone(),
        ServerOptions {
            throttle_chunk: Some(4096),
            ..ServerOptions::default()
        },
    );

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("asset.bin");
    let cancel = CancelToken::new();
    let observer = cancel.clone();
    let mut max_percent = 0.0f64;

    let err = transfer(&url, &dest, &test_config(), &cancel, |p| {
        max_percent = max_percent.max(p);
        if p >= 30.0 {
            observer.cancel();
        }
    })
    .expect_err("cancelled transfer must not succeed");

    assert!(matches!(err, TransferError::Cancelled), "got {err:?}");
    assert!(max_percent < 100.0, "must stop before reaching 100%");
    let partial = std::fs::metadata(&dest).expect("partial file is left on disk");
    assert!(
        (partial.len() as usize) < body.len(),
        "partial file must be incomplete"
    );
}

#[test]
fn transfer_http_error_is_a_failure() {
    let url = http_server::start_with_options(
        b"not found".to_vec(),
        ServerOptions {
            status: "404 Not Found",
            ..ServerOptions::default()
        },
    );

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("asset.bin");
    let err = transfer(&url, &dest, &test_config(), &CancelToken::new(), |_| {})
        .expect_err("404 must fail");
    assert!(matches!(err, TransferError::Http(404)), "got {err:?}");
}

#[test]
fn pipeline_downloads_and_extracts_with_ordered_events() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("fixture.zip");
    write_zip_fixture(
        &fixture,
        &[
            ("bin/gcc.exe", b"fake gcc".as_slice()),
            ("lib/libgcc.a", b"lib".as_slice()),
            ("readme.txt", b"hello".as_slice()),
        ],
    );
    let url = http_server::start(std::fs::read(&fixture).unwrap());

    let dest_dir = dir.path().join("downloads");
    std::fs::create_dir_all(&dest_dir).unwrap();
    let request = DownloadRequest {
        asset_name: "x86_64-13.0.0-release-posix-seh-ucrt-rt_v13-rev1.zip".to_string(),
        url,
        dest_dir: dest_dir.clone(),
        extract: true,
    };
    let out_path = request.output_path();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = pipeline::start(request, test_config(), CancelToken::new(), tx);

    let mut events = Vec::new();
    while let Some(event) = rx.blocking_recv() {
        events.push(event);
    }
    handle.join();

    // Terminal outcomes.
    let download_finished = events
        .iter()
        .position(|e| matches!(e, PipelineEvent::DownloadFinished { outcome } if outcome.is_success()))
        .expect("download must complete");
    let extract_started = events
        .iter()
        .position(|e| matches!(e, PipelineEvent::ExtractStarted { total: Some(3) }))
        .expect("count pass must find 3 entries");
    assert!(
        download_finished < extract_started,
        "extraction must start only after transfer success"
    );
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::ExtractFinished {
            outcome: ExtractOutcome::Completed
        })
    ));

    // Exactly one entry-completed event per entry, culminating at the total.
    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::ExtractProgress { done, total: Some(3) } => Some(*done),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![1, 2, 3]);

    // Download file and extracted tree on disk.
    assert!(out_path.exists());
    let tree = dest_dir.join("x86_64-13.0.0-release-posix-seh-ucrt-rt_v13-rev1");
    assert_eq!(std::fs::read(tree.join("bin/gcc.exe")).unwrap(), b"fake gcc");
    assert_eq!(std::fs::read(tree.join("readme.txt")).unwrap(), b"hello");
}

#[test]
fn pipeline_failure_skips_extraction_and_reports_failed() {
    let url = http_server::start_with_options(
        b"gone".to_vec(),
        ServerOptions {
            status: "502 Bad Gateway",
            ..ServerOptions::default()
        },
    );

    let dir = tempfile::tempdir().unwrap();
    let request = DownloadRequest {
        asset_name: "asset.zip".to_string(),
        url,
        dest_dir: dir.path().to_path_buf(),
        extract: true,
    };

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = pipeline::start(request, test_config(), CancelToken::new(), tx);

    let mut events = Vec::new();
    while let Some(event) = rx.blocking_recv() {
        events.push(event);
    }
    handle.join();

    assert!(events.iter().any(|e| matches!(
        e,
        PipelineEvent::DownloadFinished {
            outcome: TransferOutcome::Failed(_)
        }
    )));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, PipelineEvent::ExtractStarted { .. })),
        "no extraction after a failed transfer"
    );
}

#[test]
fn fetch_and_decode_releases_feed() {
    let feed = br#"[
        {
            "tag_name": "v13.0.0",
            "published_at": "2024-11-03T08:15:00Z",
            "assets": [
                {
                    "name": "x86_64-13.0.0-release-posix-seh-ucrt-rt_v13-rev1.7z",
                    "size": 50000000,
                    "browser_download_url": "https://example.invalid/a.7z"
                },
                {
                    "name": "i686-13.0.0-release-win32-dwarf-msvcrt-rev1.7z",
                    "size": 48000000,
                    "browser_download_url": "https://example.invalid/b.7z"
                }
            ]
        }
    ]"#;
    let url = http_server::start(feed.to_vec());

    let cfg = MbdConfig {
        releases_url: url,
        ..test_config()
    };
    let payload = fetch::fetch_releases(&cfg).expect("fetch");
    let releases = decode_releases(&payload).expect("decode");
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].tag, "v13.0.0");
    assert_eq!(releases[0].assets.len(), 2);

    let mut engine = filter::FilterEngine::new();
    engine.set_arch(Some(Arch::X86_64));
    assert_eq!(engine.apply(&releases[0].assets), vec![0]);
    engine.set_arch(Some(Arch::I686));
    engine.set_threads(Some(ThreadModel::Win32));
    assert_eq!(engine.apply(&releases[0].assets), vec![1]);
}

#[test]
fn fetch_http_error_is_reported() {
    let url = http_server::start_with_options(
        b"rate limited".to_vec(),
        ServerOptions {
            status: "403 Forbidden",
            ..ServerOptions::default()
        },
    );
    let cfg = MbdConfig {
        releases_url: url,
        ..test_config()
    };
    let err = fetch::fetch_releases(&cfg).expect_err("403 must fail");
    assert!(matches!(err, fetch::FetchError::Http(403)), "got {err:?}");
}
