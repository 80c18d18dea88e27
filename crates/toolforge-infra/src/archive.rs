//! Zip archives for multi-file conversion results

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Entry name for a file: its base name, never a path.
fn archive_entry_name(path: &Path, index: usize) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("unnamed_{}", index))
}

fn write_entries<W: Write + Seek>(writer: W, files: &[PathBuf]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (index, path) in files.iter().enumerate() {
        let entry = archive_entry_name(path, index);
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open file for ZIP: {}", path.display()))?;

        zip.start_file(entry.as_str(), options)
            .with_context(|| format!("Failed to add file to ZIP: {}", entry))?;
        std::io::copy(&mut file, &mut zip)
            .with_context(|| format!("Failed to write file data to ZIP: {}", entry))?;
    }

    zip.finish().context("Failed to finalize ZIP archive")
}

/// Write `files` into a zip archive at `output`, in the given order.
/// Entries are named after the files' base names.
pub fn write_zip_archive(files: &[PathBuf], output: &Path) -> Result<u64> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create archive: {}", output.display()))?;
    let mut file = write_entries(file, files)?;
    file.flush()?;

    let size = file.metadata()?.len();
    tracing::debug!(entries = files.len(), bytes = size, path = %output.display(), "Created ZIP archive");
    Ok(size)
}
