use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::grid::Grid;

/// One exported spreadsheet tab: its label and where its cells live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetSource {
    pub(crate) label: String,
    pub(crate) path: PathBuf,
}

impl SheetSource {
    pub(crate) fn from_path(path: &Path) -> Self {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            label,
            path: path.to_path_buf(),
        }
    }

    /// Read every row as raw strings, keeping the header row and ragged row lengths.
    pub(crate) fn read_grid(&self) -> Result<Grid> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open sheet: {}", self.path.display()))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(Grid::from_rows(&rows))
    }
}

/// Sheets under `path`: every `.csv` in a directory sorted by file name, or the file itself.
pub(crate) fn list_sources(path: &Path) -> Result<Vec<SheetSource>> {
    if path.is_file() {
        return Ok(vec![SheetSource::from_path(path)]);
    }

    let entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read source directory: {}", path.display()))?;
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let p = entry.path();
        let is_csv = p
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if p.is_file() && is_csv {
            files.push(p);
        }
    }
    files.sort();
    Ok(files.iter().map(|p| SheetSource::from_path(p)).collect())
}
