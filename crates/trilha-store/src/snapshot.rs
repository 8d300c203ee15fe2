//! Snapshot files: the on-disk inputs a catalog is built from.
//!
//! Relationships and translations arrive as JSON arrays of rows, the shape
//! the domain team exports from its spreadsheet tooling. The optional
//! phrasebook file overrides the built-in pt-BR copy field by field.

use std::path::Path;

use anyhow::{Context, Result};
use trilha_core::{Phrasebook, RelationRow, TranslationRow};

/// Read relationship rows from a JSON array file.
pub fn read_relation_rows(path: &Path) -> Result<Vec<RelationRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading relationship snapshot {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing relationship snapshot {}", path.display()))
}

/// Read translation rows from a JSON array file.
pub fn read_translation_rows(path: &Path) -> Result<Vec<TranslationRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading translation snapshot {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing translation snapshot {}", path.display()))
}

/// Read a phrasebook override. Fields left out keep their defaults.
pub fn read_phrasebook(path: &Path) -> Result<Phrasebook> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading phrasebook {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing phrasebook {}", path.display()))
}
