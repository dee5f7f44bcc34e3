//! Command-line interface for kartenwerk.
//!
//! Provides commands for authoring decks from JSON batches or PDF pages,
//! listing registered categories, and inspecting the active language
//! profile.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{GeminiSource, PdfSlicer};
use crate::config;
use crate::core::{Composer, RunSummary};
use crate::profile::LanguageProfile;
use crate::registry::CategoryRegistry;

/// kartenwerk - flashcard deck composer for language textbooks
#[derive(Parser, Debug)]
#[command(name = "kartenwerk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Language profile YAML (defaults to the built-in German profile)
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Category registry file (defaults to $KARTENWERK_HOME/deck_registry.json)
    #[arg(short, long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Author decks from a hand-written JSON card file
    Json {
        /// Path to the JSON file
        file: PathBuf,

        /// Output package path (synthesized under {language}/{kind}/ if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Author decks from PDF textbook pages via a generative source
    Pdf {
        /// Path to the PDF file
        file: PathBuf,

        /// Starting page number (1-indexed, inclusive)
        #[arg(short, long)]
        start_page: u32,

        /// Ending page number (1-indexed, inclusive)
        #[arg(short, long)]
        end_page: u32,

        /// Content kind; skips classification when provided
        #[arg(short = 't', long)]
        kind: Option<String>,

        /// Gemini model name
        #[arg(short, long)]
        model: Option<String>,

        /// Output package path (synthesized under {language}/{kind}/ if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered vocabulary categories
    Categories,

    /// Show the resolved language profile
    Profile,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let profile = load_profile(self.profile.as_deref())?;
        let registry_path = match self.registry {
            Some(path) => path,
            None => config::default_registry_path()?,
        };

        match self.command {
            Commands::Json { file, output } => {
                author_from_json(profile, &registry_path, &file, output.as_deref()).await
            }
            Commands::Pdf {
                file,
                start_page,
                end_page,
                kind,
                model,
                output,
            } => {
                author_from_pdf(
                    profile,
                    &registry_path,
                    &file,
                    start_page,
                    end_page,
                    kind.as_deref(),
                    model,
                    output.as_deref(),
                )
                .await
            }
            Commands::Categories => list_categories(&registry_path).await,
            Commands::Profile => show_profile(&profile),
        }
    }
}

/// Load the language profile (built-in German unless a YAML is given)
fn load_profile(path: Option<&Path>) -> Result<LanguageProfile> {
    match path {
        Some(path) => LanguageProfile::from_file(path),
        None => Ok(LanguageProfile::german()),
    }
}

/// Author decks from a JSON card file and export the package
async fn author_from_json(
    profile: LanguageProfile,
    registry_path: &Path,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read JSON file: {}", file.display()))?;
    let root: serde_json::Value =
        serde_json::from_str(&content).context("Failed to parse card JSON")?;

    let registry = CategoryRegistry::load(registry_path).await?;
    let mut composer = Composer::new(profile, registry);

    let summary = composer.import_json(&root).await?;
    let kind = export_kind(&composer, &summary);
    let path = composer.export(&kind, output).await?;

    print_summary(&summary);
    println!("Package written to {}", path.display());

    Ok(())
}

/// Slice PDF pages, generate cards through Gemini, and export the package
#[allow(clippy::too_many_arguments)]
async fn author_from_pdf(
    profile: LanguageProfile,
    registry_path: &Path,
    file: &Path,
    start_page: u32,
    end_page: u32,
    kind: Option<&str>,
    model: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let source = GeminiSource::from_env(model, &profile)?;
    let slicer = PdfSlicer::new();

    let pdf = slicer.extract_pages(file, start_page, end_page).await?;
    eprintln!(
        "Extracted {} bytes ({} pages)",
        pdf.len(),
        end_page - start_page + 1
    );

    let registry = CategoryRegistry::load(registry_path).await?;
    let mut composer = Composer::new(profile, registry);

    let summary = composer.generate_from_pdf(&source, &pdf, kind).await?;
    let export_kind = export_kind(&composer, &summary);
    let path = composer.export(&export_kind, output).await?;

    print_summary(&summary);
    println!("Package written to {}", path.display());

    Ok(())
}

/// Kind used for output-path synthesis: the first kind that contributed
/// cards, else the profile's first deck type
fn export_kind(composer: &Composer, summary: &RunSummary) -> String {
    summary
        .kinds
        .first()
        .cloned()
        .unwrap_or_else(|| composer.profile().deck_types[0].clone())
}

/// List registered categories in registration order
async fn list_categories(registry_path: &Path) -> Result<()> {
    let registry = CategoryRegistry::load(registry_path).await?;

    if registry.is_empty() {
        println!("No categories registered ({})", registry.path().display());
        return Ok(());
    }

    println!("Categories in {}:", registry.path().display());
    for category in registry.categories() {
        println!("  {}", category);
    }

    Ok(())
}

/// Show the resolved language profile
fn show_profile(profile: &LanguageProfile) -> Result<()> {
    println!("Language: {} ({})", profile.name, profile.native_locale);
    println!(
        "Translation: {} ({})",
        profile.translation_name, profile.translation_locale
    );
    println!("Deck types:");
    for kind in &profile.deck_types {
        println!("  {}", profile.qa_deck_name(kind));
    }

    Ok(())
}

/// Print a run summary
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Records authored: {}", summary.authored_records);
    println!("  Notes added: {}", summary.notes_added);

    if !summary.categories.is_empty() {
        println!("  Categories: {}", summary.categories.join(", "));
    }
    for (category, action) in &summary.deck_actions {
        println!("  Deck '{}': {}", category, action);
    }

    if !summary.diagnostics.is_empty() {
        println!("  Skipped records ({}):", summary.diagnostics.len());
        for diagnostic in &summary.diagnostics {
            println!("    - {}", diagnostic);
        }
    }
}
