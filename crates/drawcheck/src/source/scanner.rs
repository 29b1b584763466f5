use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::SourceError;

/// Supported drawing document extensions, lower-case.
const DRAWING_EXTENSIONS: &[&str] = &["pdf"];

/// Recursively discovers drawing documents under an input directory.
/// Archive extraction (zip/rar/7z) happens before this runs and is external.
pub struct DirectoryScanner {
    input_directory: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
        }
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Returns all drawing documents under the input directory, in directory
    /// walk order. A single drawing file passed as the input path is returned
    /// as-is.
    pub fn scan(&self) -> Result<Vec<PathBuf>, SourceError> {
        if self.input_directory.is_file() {
            if is_drawing(&self.input_directory) {
                return Ok(vec![self.input_directory.clone()]);
            }
            return Err(SourceError::NoDocuments(self.input_directory.clone()));
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.input_directory).min_depth(1) {
            let entry = entry.map_err(|e| SourceError::ScanFailed {
                path: self.input_directory.clone(),
                source: e,
            })?;

            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            if is_drawing(path) {
                debug!("Found drawing: {}", path.display());
                documents.push(path.to_path_buf());
            }
        }

        if documents.is_empty() {
            return Err(SourceError::NoDocuments(self.input_directory.clone()));
        }

        info!(
            "Scanned {} drawings in {}",
            documents.len(),
            self.input_directory.display()
        );
        Ok(documents)
    }
}

fn is_drawing(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| DRAWING_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
