//! Navigation path rendering for a validated recognized set.
//!
//! Topic roots anchor the consultation but never navigate, so entities at
//! the top weight are dropped. The rest are sorted ascending by weight
//! (most general first), translated to display words, and joined with `/`.

use crate::graph::{EntityRecord, GraphIndex};
use crate::translate::TranslationTable;
use crate::{RecognizedEntities, ResolveError};

/// Render the navigation path for a recognized set.
///
/// Assumes the set already passed dependency validation; this function only
/// shapes output. Weight ties keep recognized order (the sort is stable).
/// A set that filters down to nothing renders as `"/"`.
///
/// Fails with [`ResolveError::UnknownEntity`] for names outside the graph
/// and [`ResolveError::UnknownTranslation`] for entities the table does not
/// cover; a path with an internal name in it is worse than no path.
pub fn build_path(
    recognized: &RecognizedEntities,
    index: &GraphIndex,
    translations: &TranslationTable,
    top_weight: u32,
) -> Result<String, ResolveError> {
    let mut segments: Vec<&EntityRecord> = Vec::new();
    for name in recognized.iter() {
        let record = index.record(name)?;
        if record.weight == top_weight {
            continue;
        }
        segments.push(record);
    }
    segments.sort_by_key(|r| r.weight);

    let mut words = Vec::with_capacity(segments.len());
    for record in &segments {
        let word = translations.word_for(&record.name).ok_or_else(|| {
            ResolveError::UnknownTranslation {
                entity: record.name.clone(),
            }
        })?;
        words.push(word);
    }
    Ok(format!("/{}", words.join("/")))
}
