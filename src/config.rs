//! Application paths.
//!
//! Resolution order: environment variable (KARTENWERK_HOME), then
//! ~/.kartenwerk. The registry lives under the app home unless the CLI
//! points somewhere else.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// App home directory ($KARTENWERK_HOME or ~/.kartenwerk)
pub fn app_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("KARTENWERK_HOME") {
        return Ok(PathBuf::from(home));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".kartenwerk"))
}

/// Default category registry path ($APP_HOME/deck_registry.json)
pub fn default_registry_path() -> Result<PathBuf> {
    Ok(app_home()?.join("deck_registry.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_under_app_home() {
        let registry = default_registry_path().unwrap();
        assert_eq!(
            registry.file_name().and_then(|n| n.to_str()),
            Some("deck_registry.json")
        );
    }
}
