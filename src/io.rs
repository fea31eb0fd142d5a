//! File plumbing for sources and sinks.

pub mod compression;

use anyhow::{Context, Result};
use compression::{CompressedWriter, Compression};
use std::fs::{File, create_dir_all};
use std::io::Read;
use std::path::Path;

/// Open `path` for reading, decompressed as `compression` selects.
///
/// # Errors
/// Returns an error if the file cannot be opened or the codec cannot be set up.
pub fn open_input(
    path: impl AsRef<Path>,
    compression: Compression,
) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    compression::reader(f, compression, path)
        .with_context(|| format!("set up decompression for {}", path.display()))
}

/// Create (or truncate) `path` for writing, compressed as `compression` selects.
/// Creates parent directories if needed.
///
/// # Errors
/// Returns an error if a directory or the file cannot be created, or the codec cannot be set up.
pub fn create_output(
    path: impl AsRef<Path>,
    compression: Compression,
) -> Result<CompressedWriter<File>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CompressedWriter::new(f, compression, path)
        .with_context(|| format!("set up compression for {}", path.display()))
}
