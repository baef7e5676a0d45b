//! Two-pass safe archive extraction.
//!
//! Pass 1 (`count_entries`) walks entry headers without writing anything so
//! callers can prime a progress total; a failed count means "total unknown",
//! not a hard stop. Pass 2 (`extract`) opens the archive again and writes
//! each entry under the destination root.
//!
//! Per-entry rules in pass 2:
//! - empty declared path: skip the entry and continue;
//! - absolute declared path: skip the entry and continue, never join it;
//! - a normalized join escaping the destination root is a traversal attempt
//!   and aborts the whole extraction;
//! - a failed header write (directory or file creation) is entry-local: the
//!   entry is skipped and extraction continues;
//! - a failed data copy aborts the whole extraction.
//!
//! Extraction is not cancellable: once started it runs to completion or
//! failure.

mod reader;
mod safe_path;

pub use reader::{detect_format, ArchiveFormat};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tar::{Archive, EntryType};
use zip::ZipArchive;

use reader::ArchiveReader;
use safe_path::safe_join;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Archive could not be opened or its format was not recognized.
    #[error("failed to open archive: {0}")]
    Open(String),
    /// Entry-header iteration ended for a reason other than end-of-archive.
    #[error("failed to read archive: {0}")]
    Read(String),
    /// Data copy to disk failed (fatal; header-level write failures are
    /// entry-local and logged instead).
    #[error("failed to write extracted data: {0}")]
    Write(#[source] std::io::Error),
    /// An entry's declared path escapes the destination root once joined.
    #[error("archive entry escapes destination directory: {0:?}")]
    PathTraversal(PathBuf),
    /// Destination directory could not be created.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Pass 1: counts entry headers without extracting. Callers treat an error
/// as "total unknown" and still extract with indeterminate progress.
pub fn count_entries(archive: &Path) -> Result<u64, ExtractError> {
    match reader::open(archive)? {
        // The ZIP central directory is parsed at open, so the header walk
        // has already happened; the count is directly available.
        ArchiveReader::Zip(zip) => Ok(zip.len() as u64),
        ArchiveReader::Tar(mut tar) => {
            let mut count = 0u64;
            let entries = tar
                .entries()
                .map_err(|e| ExtractError::Read(e.to_string()))?;
            for entry in entries {
                entry.map_err(|e| ExtractError::Read(e.to_string()))?;
                count += 1;
            }
            Ok(count)
        }
    }
}

/// Pass 2: extracts `archive` into `dest`, creating it if needed.
/// `on_entry` receives the completed-entry counter after each finalized
/// entry; values are strictly increasing.
pub fn extract<F>(archive: &Path, dest: &Path, mut on_entry: F) -> Result<(), ExtractError>
where
    F: FnMut(u64),
{
    std::fs::create_dir_all(dest)?;
    match reader::open(archive)? {
        ArchiveReader::Zip(zip) => extract_zip(zip, dest, &mut on_entry),
        ArchiveReader::Tar(tar) => extract_tar(tar, dest, &mut on_entry),
    }
}

fn extract_zip(
    mut zip: ZipArchive<File>,
    dest: &Path,
    on_entry: &mut dyn FnMut(u64),
) -> Result<(), ExtractError> {
    let mut done = 0u64;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| ExtractError::Read(e.to_string()))?;
        let name = entry.name().to_string();
        if name.is_empty() {
            continue;
        }
        let rel = PathBuf::from(&name);
        if rel.is_absolute() {
            tracing::warn!(entry = %name, "skipping entry with absolute path");
            continue;
        }

        let target = safe_join(dest, &rel)?;
        if entry.is_dir() {
            if let Err(e) = std::fs::create_dir_all(&target) {
                tracing::warn!(entry = %name, "directory create failed, entry skipped: {}", e);
            }
        } else {
            match create_target_file(&target) {
                Ok(mut out) => {
                    std::io::copy(&mut entry, &mut out).map_err(ExtractError::Write)?;
                    apply_mode(&target, entry.unix_mode());
                }
                Err(e) => {
                    tracing::warn!(entry = %name, "entry create failed, data skipped: {}", e);
                }
            }
        }

        done += 1;
        on_entry(done);
    }
    Ok(())
}

fn extract_tar(
    mut tar: Archive<Box<dyn Read>>,
    dest: &Path,
    on_entry: &mut dyn FnMut(u64),
) -> Result<(), ExtractError> {
    let mut done = 0u64;
    let entries = tar
        .entries()
        .map_err(|e| ExtractError::Read(e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| ExtractError::Read(e.to_string()))?;
        let rel = match entry.path() {
            Ok(p) if !p.as_os_str().is_empty() => p.into_owned(),
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("skipping entry with unreadable path: {}", e);
                continue;
            }
        };
        if rel.is_absolute() {
            tracing::warn!(entry = %rel.display(), "skipping entry with absolute path");
            continue;
        }

        let target = safe_join(dest, &rel)?;
        match entry.header().entry_type() {
            EntryType::Directory => {
                if let Err(e) = std::fs::create_dir_all(&target) {
                    tracing::warn!(entry = %rel.display(), "directory create failed, entry skipped: {}", e);
                }
            }
            EntryType::Symlink => {
                if let Err(e) = write_symlink(&entry, &target) {
                    tracing::warn!(entry = %rel.display(), "symlink create failed, entry skipped: {}", e);
                }
            }
            _ => match create_target_file(&target) {
                Ok(mut out) => {
                    std::io::copy(&mut entry, &mut out).map_err(ExtractError::Write)?;
                    apply_mode(&target, entry.header().mode().ok());
                }
                Err(e) => {
                    tracing::warn!(entry = %rel.display(), "entry create failed, data skipped: {}", e);
                }
            },
        }

        done += 1;
        on_entry(done);
    }
    Ok(())
}

/// Header write for a file entry: parent directories plus the (truncated)
/// output file.
fn create_target_file(target: &Path) -> std::io::Result<File> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(target)
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        let _ = std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode));
    }
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: Option<u32>) {}

#[cfg(unix)]
fn write_symlink(entry: &tar::Entry<'_, Box<dyn Read>>, target: &Path) -> std::io::Result<()> {
    let link = entry
        .link_name()?
        .ok_or_else(|| std::io::Error::other("symlink entry without target"))?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::os::unix::fs::symlink(link, target)
}

#[cfg(not(unix))]
fn write_symlink(
    _entry: &tar::Entry<'_, Box<dyn Read>>,
    _target: &Path,
) -> std::io::Result<()> {
    Err(std::io::Error::other("symlinks unsupported on this platform"))
}
