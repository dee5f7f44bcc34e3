//! Package export.
//!
//! Flattens the deck tree into a portable JSON package and resolves where
//! it lands on disk. The package format is intentionally simple: the deck
//! list, the templates they reference, and a generation timestamp.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::deck::{Deck, DeckTree, TemplateCache};
use crate::deck::template::CardTemplate;

/// Extension for exported packages
pub const PACKAGE_EXT: &str = "json";

/// An export was attempted on a tree with zero decks
#[derive(Debug, Error)]
#[error("No decks to export; author at least one card first")]
pub struct EmptyExportError;

/// Serializable package: everything a host application needs to import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckPackage {
    /// Package format version
    pub version: u32,

    /// When the package was generated
    pub generated_at: DateTime<Utc>,

    /// Templates referenced by the notes, in first-use order
    pub templates: Vec<CardTemplate>,

    /// Decks in export order (QA decks before category decks)
    pub decks: Vec<Deck>,
}

/// Flatten a deck tree and its used templates into a package.
///
/// Never produces an empty package: a tree with zero decks is an error, not
/// an empty file.
pub fn flatten(tree: &DeckTree, templates: &TemplateCache) -> Result<DeckPackage, EmptyExportError> {
    if tree.is_empty() {
        return Err(EmptyExportError);
    }

    Ok(DeckPackage {
        version: 1,
        generated_at: Utc::now(),
        templates: templates.used().into_iter().cloned().collect(),
        decks: tree.all_decks().into_iter().cloned().collect(),
    })
}

/// Determine the on-disk output path.
///
/// An explicit path with a directory component is taken as-is. An explicit
/// bare filename is nested under `{language}/{kind}/`. No explicit path
/// synthesizes `{language}/{kind}/{language}_{kind}.json`.
pub fn resolve_output_path(language: &str, kind: &str, explicit: Option<&Path>) -> PathBuf {
    let dir = PathBuf::from(language).join(kind);

    match explicit {
        Some(path) if path.parent().is_some_and(|p| !p.as_os_str().is_empty()) => {
            path.to_path_buf()
        }
        Some(file_name) => dir.join(file_name),
        None => dir.join(format!("{}_{}.{}", language, kind, PACKAGE_EXT)),
    }
}

/// Write a package as pretty JSON, creating parent directories
pub async fn write_package(package: &DeckPackage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let content = serde_json::to_string_pretty(package)?;
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write package: {}", path.display()))?;

    Ok(())
}
