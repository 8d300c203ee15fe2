//! Data-quality report over a loaded catalog.
//!
//! Tooling-first: the catalog loads with warnings rather than failing, and
//! this command makes those warnings auditable for the domain team's review
//! loop, together with the checks that need the whole graph (cycles,
//! translation coverage).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trilha_core::BuildWarning;
use trilha_store::DomainCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReportV1 {
    pub version: String,
    pub relations: String,
    pub translations: String,
    pub summary: LintSummaryV1,
    pub findings: Vec<LintFindingV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LintSummaryV1 {
    pub entity_count: usize,
    pub translation_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintFindingV1 {
    pub level: String, // "error" | "warning" | "info"
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

pub fn run_lint(catalog: &DomainCatalog, relations: &str, translations: &str) -> LintReportV1 {
    let mut findings = Vec::new();

    for warning in &catalog.build_report().warnings {
        let (code, entity) = match warning {
            BuildWarning::ConflictingWeight { entity, .. } => ("conflicting_weight", entity),
            BuildWarning::DanglingParent { entity, .. } => ("dangling_parent", entity),
            BuildWarning::SelfParent { entity } => ("self_parent", entity),
        };
        findings.push(LintFindingV1 {
            level: "warning".to_string(),
            code: code.to_string(),
            message: warning.to_string(),
            entity: Some(entity.clone()),
        });
    }

    for conflict in catalog.translation_conflicts() {
        findings.push(LintFindingV1 {
            level: "warning".to_string(),
            code: "conflicting_translation".to_string(),
            message: format!(
                "entity `{}` keeps word `{}`, ignored `{}`",
                conflict.entity, conflict.kept, conflict.ignored
            ),
            entity: Some(conflict.entity.clone()),
        });
    }

    for record in catalog.index().entities() {
        if !catalog.translations().contains(&record.name) {
            findings.push(LintFindingV1 {
                level: "warning".to_string(),
                code: "missing_translation".to_string(),
                message: format!(
                    "entity `{}` has no display word; paths through it cannot render",
                    record.name
                ),
                entity: Some(record.name.clone()),
            });
        }
    }

    if let Some(cycle) = catalog.index().find_cycle() {
        findings.push(LintFindingV1 {
            level: "error".to_string(),
            code: "cycle".to_string(),
            message: format!("relationship cycle: {}", cycle.join(" -> ")),
            entity: cycle.first().cloned(),
        });
    }

    let top = catalog.top_weight();
    if !catalog.index().entities().any(|r| r.weight == top) {
        findings.push(LintFindingV1 {
            level: "info".to_string(),
            code: "no_topic_roots".to_string(),
            message: format!(
                "no entity carries the topic weight {top}; consultations will rely on \
                 whole-set validation only"
            ),
            entity: None,
        });
    }

    let summary = LintSummaryV1 {
        entity_count: catalog.index().len(),
        translation_count: catalog.translations().len(),
        error_count: findings.iter().filter(|f| f.level == "error").count(),
        warning_count: findings.iter().filter(|f| f.level == "warning").count(),
        info_count: findings.iter().filter(|f| f.level == "info").count(),
    };

    LintReportV1 {
        version: "1".to_string(),
        relations: relations.to_string(),
        translations: translations.to_string(),
        summary,
        findings,
    }
}

pub fn render_lint_report_text(r: &LintReportV1) -> String {
    let mut out = String::new();
    out.push_str("lint\n");
    out.push_str(&format!("  relations: {}\n", r.relations));
    out.push_str(&format!("  translations: {}\n", r.translations));
    out.push_str(&format!(
        "  summary: entities={} translations={} errors={} warnings={} infos={}\n",
        r.summary.entity_count,
        r.summary.translation_count,
        r.summary.error_count,
        r.summary.warning_count,
        r.summary.info_count
    ));

    if r.findings.is_empty() {
        out.push_str("  (no findings)\n");
        return out;
    }

    // Group by level for readability.
    let mut by_level: BTreeMap<&str, Vec<&LintFindingV1>> = BTreeMap::new();
    for f in &r.findings {
        by_level.entry(&f.level).or_default().push(f);
    }

    for (level, items) in by_level {
        out.push_str(&format!("\n{level}\n"));
        for f in items {
            let ctx = f
                .entity
                .as_ref()
                .map(|e| format!(" entity={e}"))
                .unwrap_or_default();
            out.push_str(&format!("  - {}: {}{}\n", f.code, f.message, ctx));
        }
    }

    out
}
