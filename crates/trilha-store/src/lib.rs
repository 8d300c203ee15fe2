//! Trilha Domain Catalog
//!
//! File-backed snapshots behind a swap-on-refresh handle:
//!
//! ```text
//! relations.json ────┐
//! translations.json ─┼──► load ──► DomainCatalog (immutable) ──► Resolver
//! phrasebook.json ───┘                   ▲
//!                                        │ refresh(): rebuild, then swap
//!                                 CatalogStore
//! ```
//!
//! A catalog never changes after load. [`CatalogStore::refresh`] builds a
//! whole new catalog from the files and swaps the shared handle; a
//! resolution already running keeps the catalog it started with, and a
//! refresh that fails to load leaves the current catalog in place.

pub mod snapshot;


use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use trilha_core::{
    BuildReport, BuildWarning, GraphIndex, Phrasebook, RecognizedEntities, Resolution,
    ResolveError, Resolver, TranslationConflict, TranslationTable, DEFAULT_TOP_WEIGHT,
};
use uuid::Uuid;

// ============================================================================
// Configuration
// ============================================================================

/// Where the snapshot files live and how to read the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Relationship rows (JSON array of entity/weight/parent)
    pub relations_path: PathBuf,
    /// Translation rows (JSON array of entity/word)
    pub translations_path: PathBuf,
    /// Optional phrasebook override
    pub phrasebook_path: Option<PathBuf>,
    /// Weight marking whole-domain topic roots
    pub top_weight: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            relations_path: PathBuf::from("./relations.json"),
            translations_path: PathBuf::from("./translations.json"),
            phrasebook_path: None,
            top_weight: DEFAULT_TOP_WEIGHT,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// One immutable load of the domain: graph, translations, phrasing, plus
/// everything the load had to flag.
#[derive(Debug, Clone)]
pub struct DomainCatalog {
    index: GraphIndex,
    translations: TranslationTable,
    phrasebook: Phrasebook,
    top_weight: u32,
    build_report: BuildReport,
    translation_conflicts: Vec<TranslationConflict>,
    loaded_at: DateTime<Utc>,
}

impl DomainCatalog {
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    pub fn translations(&self) -> &TranslationTable {
        &self.translations
    }

    pub fn phrasebook(&self) -> &Phrasebook {
        &self.phrasebook
    }

    pub fn top_weight(&self) -> u32 {
        self.top_weight
    }

    pub fn build_report(&self) -> &BuildReport {
        &self.build_report
    }

    pub fn translation_conflicts(&self) -> &[TranslationConflict] {
        &self.translation_conflicts
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// A resolver over this catalog.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.index, &self.translations)
            .phrasebook(self.phrasebook.clone())
            .top_weight(self.top_weight)
    }

    /// Resolve one recognized set against this catalog.
    pub fn resolve(&self, recognized: &RecognizedEntities) -> Result<Resolution, ResolveError> {
        self.resolver().resolve(recognized)
    }
}

/// What one load (or refresh) produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub entity_count: usize,
    pub translation_count: usize,
    pub build_warnings: Vec<BuildWarning>,
    pub translation_conflicts: Vec<TranslationConflict>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.build_warnings.is_empty() && self.translation_conflicts.is_empty()
    }
}

// ============================================================================
// Store
// ============================================================================

/// Shared handle over the current catalog.
///
/// Readers grab an `Arc` pointer copy and never block a refresh; a refresh
/// builds the replacement off to the side and swaps it in under a short
/// write lock. Clones of the store share the same handle.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    config: StoreConfig,
    current: Arc<RwLock<Arc<DomainCatalog>>>,
}

impl CatalogStore {
    /// Load the snapshot files and open the store.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let (catalog, report) = Self::load(&config)?;
        Self::log_report(&report);
        Ok(Self {
            config,
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        })
    }

    /// The catalog as of now.
    pub fn catalog(&self) -> Arc<DomainCatalog> {
        self.current.read().clone()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Rebuild from the files and swap the handle.
    ///
    /// On any load error the current catalog stays in place.
    pub fn refresh(&self) -> Result<RefreshReport> {
        let (catalog, report) = Self::load(&self.config)?;
        Self::log_report(&report);
        *self.current.write() = Arc::new(catalog);
        Ok(report)
    }

    fn load(config: &StoreConfig) -> Result<(DomainCatalog, RefreshReport)> {
        let rows = snapshot::read_relation_rows(&config.relations_path)?;
        let (index, build_report) = GraphIndex::build(&rows);

        let translation_rows = snapshot::read_translation_rows(&config.translations_path)?;
        let (translations, translation_conflicts) = TranslationTable::from_rows(&translation_rows);

        let phrasebook = match &config.phrasebook_path {
            Some(path) => snapshot::read_phrasebook(path)?,
            None => Phrasebook::default(),
        };

        let loaded_at = Utc::now();
        let report = RefreshReport {
            id: Uuid::new_v4(),
            loaded_at,
            entity_count: index.len(),
            translation_count: translations.len(),
            build_warnings: build_report.warnings.clone(),
            translation_conflicts: translation_conflicts.clone(),
        };
        let catalog = DomainCatalog {
            index,
            translations,
            phrasebook,
            top_weight: config.top_weight,
            build_report,
            translation_conflicts,
            loaded_at,
        };
        Ok((catalog, report))
    }

    fn log_report(report: &RefreshReport) {
        for warning in &report.build_warnings {
            tracing::warn!(%warning, "relationship snapshot irregularity");
        }
        for conflict in &report.translation_conflicts {
            tracing::warn!(
                entity = %conflict.entity,
                kept = %conflict.kept,
                ignored = %conflict.ignored,
                "conflicting translation row ignored"
            );
        }
    }
}
