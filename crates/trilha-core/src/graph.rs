//! Relationship graph: raw snapshot rows folded into an immutable index.
//!
//! The domain team maintains relationships as flat rows (`entity`, `weight`,
//! `parent`), one row per parent edge. [`GraphIndex::build`] groups those rows
//! into one [`EntityRecord`] per entity and reports every irregularity it had
//! to paper over in a [`BuildReport`] instead of failing the load:
//!
//! - conflicting weights keep the first-seen value
//! - duplicate parent edges collapse (parents are a set)
//! - parents that never appear as entities are flagged as dangling
//!
//! Records are stored in a `BTreeMap` so iteration, and everything derived
//! from it (quality findings, missing-dependency lists), is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ResolveError;

/// Weight that marks an entity as a whole-domain topic root.
///
/// Rows at this level ("history of X", "report on X") anchor consultations
/// but never appear as navigation path segments.
pub const DEFAULT_TOP_WEIGHT: u32 = 2;

// ============================================================================
// Snapshot rows
// ============================================================================

/// One relationship row as it arrives from the domain snapshot.
///
/// `parent` is `None` (or blank) for root entities; entities with several
/// alternative parents arrive as several rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRow {
    pub entity: String,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl RelationRow {
    pub fn root(entity: impl Into<String>, weight: u32) -> Self {
        Self {
            entity: entity.into(),
            weight,
            parent: None,
        }
    }

    pub fn child(entity: impl Into<String>, weight: u32, parent: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            weight,
            parent: Some(parent.into()),
        }
    }

    /// Parent name with blank values normalized away.
    fn parent_name(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

// ============================================================================
// Entity records
// ============================================================================

/// An entity after grouping: its level and the set of alternative parents.
///
/// Parents are alternatives, not conjuncts: a consultation needs any one of
/// them, never all. `BTreeSet` keeps candidate listings stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    pub weight: u32,
    pub parents: BTreeSet<String>,
}

impl EntityRecord {
    /// Root entities close a dependency chain on their own.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

// ============================================================================
// Build report
// ============================================================================

/// One irregularity observed while folding rows into records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// Rows disagree on an entity's weight; the first-seen value wins.
    ConflictingWeight {
        entity: String,
        kept: u32,
        ignored: u32,
    },
    /// A parent that never appears as an entity row of its own.
    DanglingParent { entity: String, parent: String },
    /// An entity listed as its own parent.
    SelfParent { entity: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::ConflictingWeight {
                entity,
                kept,
                ignored,
            } => write!(
                f,
                "entity `{entity}` has conflicting weights: kept {kept}, ignored {ignored}"
            ),
            BuildWarning::DanglingParent { entity, parent } => write!(
                f,
                "entity `{entity}` lists parent `{parent}` which has no entity row"
            ),
            BuildWarning::SelfParent { entity } => {
                write!(f, "entity `{entity}` lists itself as a parent")
            }
        }
    }
}

/// Outcome of a snapshot build: counts plus everything worth flagging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub row_count: usize,
    pub entity_count: usize,
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

// ============================================================================
// Graph index
// ============================================================================

/// Immutable entity index over a relationship snapshot.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    records: BTreeMap<String, EntityRecord>,
}

impl GraphIndex {
    /// Fold snapshot rows into records.
    ///
    /// Never fails: malformed input degrades into [`BuildWarning`]s so a
    /// single bad row cannot take the catalog down. Entity names are
    /// trimmed; rows with a blank entity name count as irregular input but
    /// carry nothing to index, so they are dropped silently from the record
    /// set (the row count still includes them).
    pub fn build(rows: &[RelationRow]) -> (GraphIndex, BuildReport) {
        let mut records: BTreeMap<String, EntityRecord> = BTreeMap::new();
        let mut warnings = Vec::new();

        for row in rows {
            let name = row.entity.trim();
            if name.is_empty() {
                continue;
            }

            let record = records.entry(name.to_string()).or_insert_with(|| EntityRecord {
                name: name.to_string(),
                weight: row.weight,
                parents: BTreeSet::new(),
            });

            if record.weight != row.weight {
                warnings.push(BuildWarning::ConflictingWeight {
                    entity: name.to_string(),
                    kept: record.weight,
                    ignored: row.weight,
                });
            }

            if let Some(parent) = row.parent_name() {
                if parent == name {
                    warnings.push(BuildWarning::SelfParent {
                        entity: name.to_string(),
                    });
                }
                record.parents.insert(parent.to_string());
            }
        }

        for record in records.values() {
            for parent in &record.parents {
                if parent != &record.name && !records.contains_key(parent) {
                    warnings.push(BuildWarning::DanglingParent {
                        entity: record.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let report = BuildReport {
            row_count: rows.len(),
            entity_count: records.len(),
            warnings,
        };
        (GraphIndex { records }, report)
    }

    /// Look up an entity, failing with the caller-facing error when absent.
    ///
    /// Recognized names that are not in the graph are a contract violation
    /// between the recognizer and the snapshot, never something to default
    /// around.
    pub fn record(&self, name: &str) -> Result<&EntityRecord, ResolveError> {
        self.records.get(name).ok_or_else(|| ResolveError::UnknownEntity {
            name: name.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&EntityRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in name order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    /// Entities that list `name` among their parents, in name order.
    pub fn children_of(&self, name: &str) -> Vec<&EntityRecord> {
        self.records
            .values()
            .filter(|r| r.parents.contains(name))
            .collect()
    }

    /// First cycle reachable along parent edges, if any.
    ///
    /// Returns the closed walk (first node repeated at the end). Dangling
    /// parents are skipped here; they are already reported at build time.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        // 0 = unvisited, 1 = on the current walk, 2 = exhausted
        let mut state: BTreeMap<&str, u8> = BTreeMap::new();

        for start in self.records.keys() {
            let start = start.as_str();
            if state.get(start).copied().unwrap_or(0) != 0 {
                continue;
            }

            let mut stack: Vec<(&str, Vec<&str>, usize)> =
                vec![(start, self.parent_names(start), 0)];
            let mut walk: Vec<&str> = vec![start];
            state.insert(start, 1);

            while !stack.is_empty() {
                let top = stack.len() - 1;
                let (node, next) = {
                    let (node, parents, idx) = &mut stack[top];
                    if *idx < parents.len() {
                        let parent = parents[*idx];
                        *idx += 1;
                        (*node, Some(parent))
                    } else {
                        (*node, None)
                    }
                };

                let Some(parent) = next else {
                    state.insert(node, 2);
                    stack.pop();
                    walk.pop();
                    continue;
                };
                if !self.records.contains_key(parent) {
                    continue;
                }
                match state.get(parent).copied().unwrap_or(0) {
                    0 => {
                        state.insert(parent, 1);
                        stack.push((parent, self.parent_names(parent), 0));
                        walk.push(parent);
                    }
                    1 => {
                        let from = walk.iter().position(|n| *n == parent).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            walk[from..].iter().map(|n| n.to_string()).collect();
                        cycle.push(parent.to_string());
                        return Some(cycle);
                    }
                    _ => {}
                }
            }
        }
        None
    }

    fn parent_names(&self, name: &str) -> Vec<&str> {
        self.records
            .get(name)
            .map(|r| r.parents.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RelationRow> {
        vec![
            RelationRow::root("cliente", 0),
            RelationRow::root("produto", 0),
            RelationRow::child("compra", 1, "cliente"),
            RelationRow::child("compra", 1, "produto"),
            RelationRow::child("historico", 2, "compra"),
        ]
    }

    #[test]
    fn build_groups_rows_into_records() {
        let (index, report) = GraphIndex::build(&rows());

        assert!(report.is_clean());
        assert_eq!(report.row_count, 5);
        assert_eq!(report.entity_count, 4);

        let compra = index.get("compra").unwrap();
        assert_eq!(compra.weight, 1);
        let parents: Vec<&str> = compra.parents.iter().map(String::as_str).collect();
        assert_eq!(parents, vec!["cliente", "produto"]);

        assert!(index.get("cliente").unwrap().is_root());
        assert!(!index.get("historico").unwrap().is_root());
    }

    #[test]
    fn duplicate_parent_rows_collapse() {
        let mut input = rows();
        input.push(RelationRow::child("compra", 1, "cliente"));

        let (index, report) = GraphIndex::build(&input);
        assert!(report.is_clean());
        assert_eq!(index.get("compra").unwrap().parents.len(), 2);
    }

    #[test]
    fn conflicting_weight_keeps_first_seen() {
        let mut input = rows();
        input.push(RelationRow::child("compra", 7, "produto"));

        let (index, report) = GraphIndex::build(&input);
        assert_eq!(index.get("compra").unwrap().weight, 1);
        assert_eq!(
            report.warnings,
            vec![BuildWarning::ConflictingWeight {
                entity: "compra".to_string(),
                kept: 1,
                ignored: 7,
            }]
        );
    }

    #[test]
    fn dangling_parent_is_flagged_but_kept() {
        let input = vec![
            RelationRow::root("cliente", 0),
            RelationRow::child("compra", 1, "fornecedor"),
        ];

        let (index, report) = GraphIndex::build(&input);
        assert!(index.get("compra").unwrap().parents.contains("fornecedor"));
        assert_eq!(
            report.warnings,
            vec![BuildWarning::DanglingParent {
                entity: "compra".to_string(),
                parent: "fornecedor".to_string(),
            }]
        );
    }

    #[test]
    fn self_parent_is_flagged() {
        let input = vec![RelationRow::child("eco", 1, "eco")];
        let (_, report) = GraphIndex::build(&input);
        assert_eq!(
            report.warnings,
            vec![BuildWarning::SelfParent {
                entity: "eco".to_string(),
            }]
        );
    }

    #[test]
    fn blank_names_are_normalized() {
        let input = vec![
            RelationRow::root("  cliente  ", 0),
            RelationRow::child("compra", 1, "  cliente "),
            RelationRow::child("compra", 1, "   "),
            RelationRow::root("", 3),
        ];

        let (index, report) = GraphIndex::build(&input);
        assert_eq!(report.entity_count, 2);
        assert!(index.contains("cliente"));
        let compra = index.get("compra").unwrap();
        assert_eq!(compra.parents.len(), 1);
        assert!(compra.parents.contains("cliente"));
        assert!(report.is_clean());
    }

    #[test]
    fn record_fails_on_unknown_entity() {
        let (index, _) = GraphIndex::build(&rows());
        let err = index.record("estoque").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownEntity {
                name: "estoque".to_string(),
            }
        );
    }

    #[test]
    fn children_listing_is_sorted() {
        let (index, _) = GraphIndex::build(&[
            RelationRow::root("cliente", 0),
            RelationRow::child("devolucao", 1, "cliente"),
            RelationRow::child("compra", 1, "cliente"),
        ]);
        let children: Vec<&str> = index
            .children_of("cliente")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(children, vec!["compra", "devolucao"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let (index, _) = GraphIndex::build(&rows());
        assert_eq!(index.find_cycle(), None);
    }

    #[test]
    fn two_node_cycle_is_reported() {
        let (index, _) = GraphIndex::build(&[
            RelationRow::child("a", 0, "b"),
            RelationRow::child("b", 1, "a"),
        ]);
        let cycle = index.find_cycle().expect("cycle");
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.len() >= 3);
        assert!(cycle.contains(&"a".to_string()));
        assert!(cycle.contains(&"b".to_string()));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let (index, _) = GraphIndex::build(&[RelationRow::child("eco", 1, "eco")]);
        let cycle = index.find_cycle().expect("cycle");
        assert_eq!(cycle, vec!["eco".to_string(), "eco".to_string()]);
    }
}
