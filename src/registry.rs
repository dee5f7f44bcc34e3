//! Persistent category registry.
//!
//! Tracks which vocabulary categories have been created across runs, so a
//! re-run extends an existing category deck instead of spawning a duplicate
//! under a near-identical name. Matching is case-insensitive and
//! whitespace-trimmed, nothing more: accent or punctuation variants are
//! distinct categories by design.
//!
//! Every new registration is persisted immediately (not batched), so a
//! crash between categories loses at most the registration in flight.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// On-disk registry document. The category list round-trips in order,
/// even though lookup is unordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    categories: Vec<String>,
}

/// Case-insensitive set of known category names, backed by a JSON file
#[derive(Debug)]
pub struct CategoryRegistry {
    path: PathBuf,
    categories: Vec<String>,
}

impl CategoryRegistry {
    /// Load the registry from disk, or start empty if the file is missing
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                categories: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read registry: {}", path.display()))?;

        let file: RegistryFile =
            serde_json::from_str(&content).context("Failed to parse registry JSON")?;

        Ok(Self {
            path,
            categories: file.categories,
        })
    }

    /// Save the registry to disk.
    ///
    /// Writes a sibling temp file and renames it into place so a kill
    /// mid-write cannot truncate an existing registry.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file = RegistryFile {
            version: 1,
            categories: self.categories.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write registry: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace registry: {}", self.path.display()))?;

        Ok(())
    }

    /// Case-insensitive, trimmed membership test
    pub fn exists(&self, name: &str) -> bool {
        self.find_match(name).is_some()
    }

    /// Find the stored original-cased name matching `name` case-insensitively
    pub fn find_match(&self, name: &str) -> Option<&str> {
        let normalized = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.trim().to_lowercase() == normalized)
            .map(|c| c.as_str())
    }

    /// Register a category, persisting immediately.
    ///
    /// Idempotent: a name that already matches case-insensitively is a
    /// no-op. New names are stored verbatim.
    pub async fn register(&mut self, name: &str) -> Result<()> {
        if self.exists(name) {
            return Ok(());
        }

        self.categories.push(name.to_string());
        self.save().await
    }

    /// Snapshot of all registered categories, in registration order
    pub fn categories(&self) -> Vec<String> {
        self.categories.clone()
    }

    /// Number of registered categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Registry file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_register_and_match_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let mut registry = CategoryRegistry::load(temp.path().join("registry.json"))
            .await
            .unwrap();

        registry.register("body parts").await.unwrap();

        assert!(registry.exists("Body Parts"));
        assert!(registry.exists("  BODY PARTS  "));
        // Original casing wins
        assert_eq!(registry.find_match("Body Parts"), Some("body parts"));
    }

    #[tokio::test]
    async fn test_register_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut registry = CategoryRegistry::load(temp.path().join("registry.json"))
            .await
            .unwrap();

        registry.register("Food").await.unwrap();
        registry.register("food").await.unwrap();
        registry.register("FOOD").await.unwrap();

        assert_eq!(registry.categories(), vec!["Food"]);
    }

    #[tokio::test]
    async fn test_accent_variants_are_distinct() {
        let temp = TempDir::new().unwrap();
        let mut registry = CategoryRegistry::load(temp.path().join("registry.json"))
            .await
            .unwrap();

        registry.register("Café").await.unwrap();
        registry.register("Cafe").await.unwrap();

        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let registry = CategoryRegistry::load(temp.path().join("nope.json"))
            .await
            .unwrap();
        assert!(registry.is_empty());
    }
}
