//! Adapter interfaces for external collaborators.
//!
//! The composer core never talks to an AI service or a PDF library
//! directly: content classification and card generation go through the
//! [`CardSource`] trait, and page slicing through [`PdfSlicer`].

pub mod gemini;
pub mod pdf;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiSource;
pub use pdf::{PageRangeError, PdfSlicer};

/// Raw vocabulary records grouped by the category the generator detected
pub type CategorizedRecords = Vec<(String, Vec<Value>)>;

/// Trait for generative card sources.
///
/// Records come back as raw JSON objects; CardAuthoring validates them
/// before anything reaches the deck tree.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Classify extracted pages, returning a content-kind label.
    ///
    /// The label is a free-form candidate; the composer resolves it against
    /// the active language profile.
    async fn classify(&self, pdf: &[u8]) -> Result<String>;

    /// Generate question/answer records for a Q&A-style kind
    async fn generate_qa(&self, kind: &str, pdf: &[u8]) -> Result<Vec<Value>>;

    /// Generate vocabulary records with category detection.
    ///
    /// `existing_categories` lets the generator prefer matching an already
    /// registered category over inventing a near-duplicate name.
    async fn generate_vocabulary(
        &self,
        pdf: &[u8],
        existing_categories: &[String],
    ) -> Result<CategorizedRecords>;
}
