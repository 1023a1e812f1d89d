use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

/// PDF files directly inside `dir`, sorted by case-folded file name.
///
/// Subdirectories are not descended into. The extension match ignores case.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| ExtractError::from_io(dir, err))?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();

    pdfs.sort_by_cached_key(|path| sort_key(path));
    Ok(pdfs)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
