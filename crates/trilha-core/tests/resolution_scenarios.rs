//! End-to-end resolution scenarios over the purchases domain the chat
//! product ships with, exercised through the public crate API only.

use trilha_core::{
    GraphIndex, Phrasebook, RecognizedEntities, RelationRow, Resolution, Resolver,
    TranslationRow, TranslationTable,
};

// ============================================================================
// Fixtures
// ============================================================================

fn purchases_rows() -> Vec<RelationRow> {
    vec![
        RelationRow::root("cliente", 0),
        RelationRow::root("produto", 0),
        RelationRow::child("compra", 1, "cliente"),
        RelationRow::child("compra", 1, "produto"),
        RelationRow::child("devolucao", 1, "cliente"),
        RelationRow::child("devolucao", 1, "produto"),
        RelationRow::child("historico", 2, "compra"),
        RelationRow::child("historico", 2, "devolucao"),
        RelationRow::child("desconto", 2, "compra"),
        RelationRow::child("desconto", 2, "devolucao"),
    ]
}

fn purchases_translations() -> Vec<TranslationRow> {
    vec![
        TranslationRow::new("cliente", "Cliente"),
        TranslationRow::new("produto", "Produto"),
        TranslationRow::new("compra", "Compra"),
        TranslationRow::new("devolucao", "Devolução"),
        TranslationRow::new("historico", "Histórico"),
        TranslationRow::new("desconto", "Desconto"),
    ]
}

fn resolve(names: &[&str]) -> Resolution {
    let (index, report) = GraphIndex::build(&purchases_rows());
    assert!(report.is_clean(), "fixture rows should be clean: {report:?}");
    let (translations, conflicts) = TranslationTable::from_rows(&purchases_translations());
    assert!(conflicts.is_empty());

    Resolver::new(&index, &translations)
        .resolve(&RecognizedEntities::new(names.iter().copied()))
        .expect("fixture names are all known")
}

fn resolved(path: &str) -> Resolution {
    Resolution::Resolved {
        path: path.to_string(),
    }
}

fn ambiguous(prompt: &str) -> Resolution {
    Resolution::Ambiguous {
        prompt: prompt.to_string(),
    }
}

// ============================================================================
// Happy paths
// ============================================================================

#[test]
fn full_chain_down_to_a_client_purchase_history() {
    assert_eq!(
        resolve(&["historico", "compra", "cliente"]),
        resolved("/Cliente/Compra")
    );
}

#[test]
fn returns_chain_through_a_product() {
    assert_eq!(
        resolve(&["desconto", "devolucao", "produto"]),
        resolved("/Produto/Devolução")
    );
}

#[test]
fn roots_resolve_on_their_own() {
    assert_eq!(resolve(&["cliente"]), resolved("/Cliente"));
    assert_eq!(resolve(&["cliente", "produto"]), resolved("/Cliente/Produto"));
}

#[test]
fn input_order_does_not_change_the_path() {
    let expected = resolved("/Cliente/Compra");
    assert_eq!(resolve(&["historico", "compra", "cliente"]), expected);
    assert_eq!(resolve(&["cliente", "historico", "compra"]), expected);
    assert_eq!(resolve(&["compra", "cliente", "historico"]), expected);
}

#[test]
fn repeated_recognitions_collapse() {
    assert_eq!(
        resolve(&["historico", "compra", "compra", "cliente", "historico"]),
        resolved("/Cliente/Compra")
    );
}

// ============================================================================
// Clarification questions
// ============================================================================

#[test]
fn purchase_without_an_owner_asks_which_kind() {
    assert_eq!(
        resolve(&["historico", "compra"]),
        ambiguous(
            "Você está consultando sobre Compra, mas está se referindo a que tipo de \
             Compra: Cliente ou Produto."
        )
    );
}

#[test]
fn lone_history_asks_what_it_is_a_history_of() {
    assert_eq!(
        resolve(&["historico"]),
        ambiguous(
            "Você está consultando sobre Histórico, mas está se referindo a que tipo de \
             Histórico: Compra ou Devolução."
        )
    );
}

#[test]
fn both_owners_present_still_needs_a_choice() {
    assert_eq!(
        resolve(&["historico", "compra", "cliente", "produto"]),
        ambiguous(
            "Você está consultando sobre Compra, mas está se referindo a que tipo de \
             Compra: Cliente ou Produto."
        )
    );
}

// ============================================================================
// Missing dependencies
// ============================================================================

#[test]
fn purchase_alone_reports_its_alternatives() {
    assert_eq!(
        resolve(&["compra"]),
        Resolution::MissingDependency {
            entity: Some("compra".to_string()),
            missing: vec!["cliente".to_string(), "produto".to_string()],
        }
    );
}

#[test]
fn nothing_recognized_reports_an_empty_shortfall() {
    assert_eq!(
        resolve(&[]),
        Resolution::MissingDependency {
            entity: None,
            missing: Vec::new(),
        }
    );
}

// ============================================================================
// Boundary payloads and phrasebook overrides
// ============================================================================

#[test]
fn answers_serialize_for_the_chat_layer() {
    let json = serde_json::to_value(resolve(&["historico", "compra"])).unwrap();
    assert_eq!(json["outcome"], "ambiguous");
    assert!(json["prompt"]
        .as_str()
        .unwrap()
        .contains("Cliente ou Produto"));

    let json = serde_json::to_value(resolve(&["historico", "compra", "cliente"])).unwrap();
    assert_eq!(json["outcome"], "resolved");
    assert_eq!(json["path"], "/Cliente/Compra");
}

#[test]
fn a_deployment_can_restate_the_question() {
    let (index, _) = GraphIndex::build(&purchases_rows());
    let (translations, _) = TranslationTable::from_rows(&purchases_translations());
    let book = Phrasebook {
        clarify_template: "Qual {topic}? Opções: {candidates}.".to_string(),
        ..Phrasebook::default()
    };

    let answer = Resolver::new(&index, &translations)
        .phrasebook(book)
        .resolve(&RecognizedEntities::new(["historico", "compra"]))
        .unwrap();
    assert_eq!(
        answer,
        Resolution::Ambiguous {
            prompt: "Qual Compra? Opções: Cliente ou Produto.".to_string(),
        }
    );
}
