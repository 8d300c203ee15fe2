//! Dependency validation: is a recognized set self-sufficient?
//!
//! Every non-root entity in the set must have at least one of its parents
//! in the set too. Parents are alternatives (a purchase belongs to a client
//! or to a product), so one present parent closes the requirement.
//!
//! Checking stops at the first unsatisfied entity, in recognized order, and
//! reports all of that entity's parents as the missing alternatives.

use serde::{Deserialize, Serialize};

use crate::graph::GraphIndex;
use crate::{RecognizedEntities, ResolveError};

/// Result of checking one recognized set against the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Every entity is a root or has a parent in the set.
    Satisfied,
    /// `entity` is in the set but none of its parents are. `missing` lists
    /// the alternatives, in name order.
    Unsatisfied { entity: String, missing: Vec<String> },
}

impl ValidationOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ValidationOutcome::Satisfied)
    }
}

/// Check that every recognized entity has its dependency covered.
///
/// Fails with [`ResolveError::UnknownEntity`] if a recognized name has no
/// graph record; an empty set is trivially satisfied.
pub fn validate(
    recognized: &RecognizedEntities,
    index: &GraphIndex,
) -> Result<ValidationOutcome, ResolveError> {
    for name in recognized.iter() {
        let record = index.record(name)?;
        if record.is_root() {
            continue;
        }
        if record.parents.iter().any(|p| recognized.contains(p)) {
            continue;
        }
        return Ok(ValidationOutcome::Unsatisfied {
            entity: name.to_string(),
            missing: record.parents.iter().cloned().collect(),
        });
    }
    Ok(ValidationOutcome::Satisfied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationRow;

    fn index() -> GraphIndex {
        let (index, _) = GraphIndex::build(&[
            RelationRow::root("cliente", 0),
            RelationRow::root("produto", 0),
            RelationRow::child("compra", 1, "cliente"),
            RelationRow::child("compra", 1, "produto"),
            RelationRow::child("devolucao", 1, "cliente"),
            RelationRow::child("devolucao", 1, "produto"),
            RelationRow::child("historico", 2, "compra"),
        ]);
        index
    }

    fn recognized(names: &[&str]) -> RecognizedEntities {
        RecognizedEntities::new(names.iter().copied())
    }

    #[test]
    fn roots_alone_are_satisfied() {
        let outcome = validate(&recognized(&["cliente"]), &index()).unwrap();
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn either_parent_satisfies_the_alternative() {
        let index = index();
        for parent in ["cliente", "produto"] {
            let outcome = validate(&recognized(&["compra", parent]), &index).unwrap();
            assert!(outcome.is_satisfied(), "parent {parent} should satisfy");
        }
    }

    #[test]
    fn missing_parent_lists_all_alternatives_sorted() {
        let outcome = validate(&recognized(&["compra"]), &index()).unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::Unsatisfied {
                entity: "compra".to_string(),
                missing: vec!["cliente".to_string(), "produto".to_string()],
            }
        );
    }

    #[test]
    fn a_present_parent_does_not_excuse_its_own_dependency() {
        // historico is covered by compra, but compra itself is not covered.
        let outcome = validate(&recognized(&["historico", "compra"]), &index()).unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::Unsatisfied {
                entity: "compra".to_string(),
                missing: vec!["cliente".to_string(), "produto".to_string()],
            }
        );
    }

    #[test]
    fn first_unsatisfied_entity_wins_in_recognized_order() {
        let index = index();

        let outcome = validate(&recognized(&["devolucao", "compra"]), &index).unwrap();
        assert!(matches!(
            outcome,
            ValidationOutcome::Unsatisfied { ref entity, .. } if entity == "devolucao"
        ));

        let outcome = validate(&recognized(&["compra", "devolucao"]), &index).unwrap();
        assert!(matches!(
            outcome,
            ValidationOutcome::Unsatisfied { ref entity, .. } if entity == "compra"
        ));
    }

    #[test]
    fn chain_with_every_link_present_is_satisfied() {
        let outcome =
            validate(&recognized(&["historico", "compra", "cliente"]), &index()).unwrap();
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn empty_set_is_trivially_satisfied() {
        let outcome = validate(&recognized(&[]), &index()).unwrap();
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let err = validate(&recognized(&["estoque"]), &index()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownEntity {
                name: "estoque".to_string(),
            }
        );
    }
}
