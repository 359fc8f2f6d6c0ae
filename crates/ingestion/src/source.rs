//! Opening input files, with transparent gzip decompression.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::{IngestionError, Result};

/// Compression detected from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    /// `.gz` suffix (NOAA bulk exports ship as `*.csv.gz`)
    Gzip,
}

/// Detect compression from the path's extension.
pub fn detect_compression(path: &Path) -> Compression {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("gz") => Compression::Gzip,
        _ => Compression::None,
    }
}

/// Open a file for reading, decompressing it if the name ends in `.gz`.
///
/// A missing file is reported as [`IngestionError::MissingInput`] so the
/// caller can tell it apart from a read failure.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if !path.exists() {
        return Err(IngestionError::MissingInput(path.to_path_buf()));
    }

    let file = BufReader::new(File::open(path)?);
    let compression = detect_compression(path);
    debug!(path = %path.display(), ?compression, "Opening input");

    Ok(match compression {
        Compression::Gzip => Box::new(GzDecoder::new(file)),
        Compression::None => Box::new(file),
    })
}
