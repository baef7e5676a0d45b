//! Archive container detection and read-side opening.
//!
//! Two containers are read-supported: ZIP and TAR, the latter plain or
//! behind a gzip filter. Detection goes by file extension first and falls
//! back to magic bytes so misnamed downloads still open.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use zip::ZipArchive;

use super::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

/// Read-side handle over one opened archive. Each pass opens its own.
pub enum ArchiveReader {
    Zip(ZipArchive<File>),
    Tar(Archive<Box<dyn Read>>),
}

pub fn detect_format(path: &Path) -> Result<ArchiveFormat, ExtractError> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if name.ends_with(".zip") {
        return Ok(ArchiveFormat::Zip);
    }
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        return Ok(ArchiveFormat::TarGz);
    }
    if name.ends_with(".tar") {
        return Ok(ArchiveFormat::Tar);
    }
    sniff_format(path)
}

/// Magic-byte fallback: ZIP local header, gzip header, or `ustar` at 257.
fn sniff_format(path: &Path) -> Result<ArchiveFormat, ExtractError> {
    let mut file = File::open(path)
        .map_err(|e| ExtractError::Open(format!("{}: {}", path.display(), e)))?;
    let mut header = [0u8; 262];
    let n = file
        .read(&mut header)
        .map_err(|e| ExtractError::Open(format!("{}: {}", path.display(), e)))?;

    if n >= 4 && header[..4] == [0x50, 0x4B, 0x03, 0x04] {
        return Ok(ArchiveFormat::Zip);
    }
    if n >= 2 && header[..2] == [0x1F, 0x8B] {
        return Ok(ArchiveFormat::TarGz);
    }
    if n >= 262 && &header[257..262] == b"ustar" {
        return Ok(ArchiveFormat::Tar);
    }
    Err(ExtractError::Open(format!(
        "unrecognized archive format: {}",
        path.display()
    )))
}

/// Opens `path` for reading with the detected container format.
pub fn open(path: &Path) -> Result<ArchiveReader, ExtractError> {
    let format = detect_format(path)?;
    let file = File::open(path)
        .map_err(|e| ExtractError::Open(format!("{}: {}", path.display(), e)))?;

    match format {
        ArchiveFormat::Zip => {
            let archive = ZipArchive::new(file)
                .map_err(|e| ExtractError::Open(format!("{}: {}", path.display(), e)))?;
            Ok(ArchiveReader::Zip(archive))
        }
        ArchiveFormat::Tar => Ok(ArchiveReader::Tar(Archive::new(Box::new(file)))),
        ArchiveFormat::TarGz => Ok(ArchiveReader::Tar(Archive::new(Box::new(
            GzDecoder::new(file),
        )))),
    }
}
