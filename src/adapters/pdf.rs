//! PDF page slicing.
//!
//! Extracts a 1-indexed, inclusive page range from a PDF as standalone PDF
//! bytes for the generative source. Uses the `qpdf` CLI as the slicing
//! backend via subprocess.

use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::process::Command;

/// Invalid page range for a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageRangeError {
    #[error("start_page must be at least 1 (got {0})")]
    StartBeforeFirst(u32),

    #[error("start_page ({start}) must not be after end_page ({end})")]
    StartAfterEnd { start: u32, end: u32 },

    #[error("end_page ({end}) exceeds document pages ({pages})")]
    EndBeyondDocument { end: u32, pages: u32 },
}

/// Validate a 1-indexed, inclusive page range against a page count
pub fn validate_range(start: u32, end: u32, pages: u32) -> Result<(), PageRangeError> {
    if start < 1 {
        return Err(PageRangeError::StartBeforeFirst(start));
    }
    if start > end {
        return Err(PageRangeError::StartAfterEnd { start, end });
    }
    if end > pages {
        return Err(PageRangeError::EndBeyondDocument { end, pages });
    }
    Ok(())
}

/// PDF slicer backed by the qpdf CLI
pub struct PdfSlicer {
    binary_path: String,
}

impl Default for PdfSlicer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSlicer {
    /// Create a slicer using `qpdf` from PATH
    pub fn new() -> Self {
        Self {
            binary_path: "qpdf".to_string(),
        }
    }

    /// Create a slicer with a custom qpdf binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Total page count of a document
    pub async fn page_count(&self, path: &Path) -> Result<u32> {
        let output = Command::new(&self.binary_path)
            .arg("--show-npages")
            .arg(path)
            .output()
            .await
            .with_context(|| format!("Failed to run {} --show-npages", self.binary_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "qpdf failed to read {}: {}",
                path.display(),
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse()
            .with_context(|| format!("Unexpected qpdf page count output: {}", stdout.trim()))
    }

    /// Extract pages `start..=end` (1-indexed) as standalone PDF bytes
    pub async fn extract_pages(&self, path: &Path, start: u32, end: u32) -> Result<Vec<u8>> {
        let pages = self.page_count(path).await?;
        validate_range(start, end, pages)?;

        let sliced = NamedTempFile::new().context("Failed to create temp file for slice")?;

        let output = Command::new(&self.binary_path)
            .arg("--empty")
            .arg("--pages")
            .arg(path)
            .arg(format!("{}-{}", start, end))
            .arg("--")
            .arg(sliced.path())
            .output()
            .await
            .with_context(|| format!("Failed to run {} --pages", self.binary_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "qpdf failed to slice pages {}-{} from {}: {}",
                start,
                end,
                path.display(),
                stderr.trim()
            );
        }

        let bytes = tokio::fs::read(sliced.path())
            .await
            .context("Failed to read sliced PDF")?;
        Ok(bytes)
    }
}
