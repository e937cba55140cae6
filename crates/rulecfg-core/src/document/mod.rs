//! Configuration documents driven by TOML or JSON.
//!
//! # Architecture
//!
//! ```text
//! TOML / JSON text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert (loader)
//! ConfigDocument (pure domain model)
//!   ↓ ConfigResolver::builder().document(..).build()
//! per-file ResolvedConfig
//! ```

use std::path::Path;

pub mod config_dto;
pub mod loader;
pub mod model;

use config_dto::ConfigDocumentDto;
use loader::LoadError;
use model::ConfigDocument;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// TOML (default).
    #[default]
    Toml,
    /// JSON.
    Json,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything but `.json` is TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Deserializes document text into the DTO layer.
///
/// # Errors
///
/// Returns `LoadError::Parse` if the text is not valid for `format`.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<ConfigDocumentDto, LoadError> {
    let parsed = match format {
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.message().to_string()),
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| LoadError::Parse {
        origin: origin.to_string(),
        message,
    })
}

/// Parses and validates a document.
///
/// # Errors
///
/// Returns an error if parsing or validation fails.
pub fn load_document(
    content: &str,
    format: DocumentFormat,
    source: Option<&Path>,
) -> Result<ConfigDocument, LoadError> {
    let origin = source.map_or_else(|| "<inline>".to_string(), |p| p.display().to_string());
    let dto = parse_document(content, format, &origin)?;
    loader::load(dto, source)
}

impl ConfigDocument {
    /// Loads a document from disk. The format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let doc = load_document(&content, DocumentFormat::from_path(path), Some(path))?;
        tracing::debug!(
            path = %path.display(),
            rules = doc.rules().len(),
            overrides = doc.overrides().len(),
            "loaded configuration document"
        );
        Ok(doc)
    }

    /// Parses an in-memory TOML document with no source path.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        load_document(content, DocumentFormat::Toml, None)
    }
}
