// src/upload.rs
use log::warn;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TiacherError};

pub const PDF_MIME: &str = "application/pdf";
pub const PDF_ONLY_WARNING: &str = "Only PDF files are allowed.";

/// True for files whose guessed MIME type is PDF or whose name ends in `.pdf`.
pub fn is_pdf(path: &Path) -> bool {
    let by_mime = mime_guess::from_path(path)
        .iter()
        .any(|m| m.essence_str() == PDF_MIME);
    let by_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    by_mime || by_name
}

/// Result of adding a batch of files to the selection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AddReport {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<PathBuf>,
}

impl AddReport {
    /// The warning to show when anything was left out.
    pub fn warning(&self) -> Option<&'static str> {
        (!self.rejected.is_empty()).then_some(PDF_ONLY_WARNING)
    }
}

/// PDF files chosen for upload, in the order they were added.
#[derive(Debug, Default, Clone)]
pub struct FileSelection {
    files: Vec<PathBuf>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds dropped or picked files, keeping the PDFs and reporting the rest.
    pub fn add<I, P>(&mut self, paths: I) -> AddReport
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut report = AddReport::default();
        for path in paths.into_iter().map(Into::into) {
            if is_pdf(&path) {
                self.files.push(path.clone());
                report.accepted.push(path);
            } else {
                warn!("Skipping non-PDF file {}", path.display());
                report.rejected.push(path);
            }
        }
        report
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Reads every selected file as `(file name, bytes)`.
    pub async fn load(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut loaded = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    TiacherError::Validation(format!("'{}' is not a file", path.display()))
                })?;
            let bytes = tokio::fs::read(path).await?;
            loaded.push((name, bytes));
        }
        Ok(loaded)
    }
}
