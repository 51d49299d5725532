//! Persisted build counter.
//!
//! The counter file holds a single base-10 integer: the version number of the
//! last build (file mode) or the next one to use.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use thiserror::Error;

/// Errors from reading or writing the counter file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Counter file not found: {0}")]
    FileNotFound(Utf8PathBuf),

    #[error("Failed to write counter file {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read counter file {path}: {source}")]
    ReadFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Counter file {path} does not hold a version number: {value:?}")]
    InvalidValue { path: Utf8PathBuf, value: String },

    #[error("Version number {0} cannot be incremented")]
    CounterOverflow(u64),
}

/// Whether a regular file is present at `path`.
///
/// Any I/O error (permissions, broken links) counts as absent.
pub fn exists(path: &Utf8Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Read the version number from the first line of the counter file.
pub fn read(path: &Utf8Path) -> Result<u64, StoreError> {
    if !exists(path) {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| StoreError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| StoreError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    parse_version_number(&line).ok_or_else(|| StoreError::InvalidValue {
        path: path.to_path_buf(),
        value: line.trim_end().to_string(),
    })
}

/// Replace the counter file's content with `value`.
///
/// Fails with [`StoreError::FileNotFound`] if the file is absent and
/// `create_if_missing` is false.
pub fn write(path: &Utf8Path, value: u64, create_if_missing: bool) -> Result<(), StoreError> {
    if !exists(path) && !create_if_missing {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }

    fs::write(path, value.to_string()).map_err(|source| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Wrote counter {} to {}", value, path);
    Ok(())
}

/// Largest version number accepted: the signed 64-bit range, as Java build tooling reads it.
pub const MAX_VERSION_NUMBER: u64 = i64::MAX as u64;

/// Parse a non-negative base-10 version number, rejecting values past [`MAX_VERSION_NUMBER`].
pub fn parse_version_number(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed
        .parse::<u64>()
        .ok()
        .filter(|n| *n <= MAX_VERSION_NUMBER)
}

/// The counter value that follows `current`.
pub fn next_value(current: u64) -> Result<u64, StoreError> {
    current
        .checked_add(1)
        .filter(|n| *n <= MAX_VERSION_NUMBER)
        .ok_or(StoreError::CounterOverflow(current))
}
