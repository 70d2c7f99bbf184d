//! Structural precondition for annotated containers, with a rewrite quickfix.
//!
//! Generated members are added to the annotated container, so it and every
//! enclosing container must be partial, and each method must be a partial
//! declaration without a body.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::decls::{AnnotatedContainer, DeclDocument};
use crate::diagnostics::{
    Diagnostic, Location, PatchOp, Quickfix, QuickfixKind, Report, Severity, Stage,
};
use crate::json_patch::{self, PatchError};

pub const PRECONDITION_CODE: &str = "MI0001";

pub fn check_document(doc: &DeclDocument) -> Report {
    let annotated = doc.annotated();
    let diagnostics: Vec<Diagnostic> = annotated.iter().filter_map(check_container).collect();
    debug!(
        containers = annotated.len(),
        diagnostics = diagnostics.len(),
        "checked declaration document"
    );
    Report::ok().with_diagnostics(diagnostics)
}

fn check_container(ac: &AnnotatedContainer<'_>) -> Option<Diagnostic> {
    let mut notes = Vec::new();
    let mut patch = Vec::new();

    for (ancestor, ptr) in &ac.ancestors {
        if !ancestor.partial {
            notes.push(format!("enclosing container {:?} is not partial", ancestor.name));
            patch.push(mark_partial(ptr));
        }
    }
    if !ac.container.partial {
        notes.push(format!("container {:?} is not partial", ac.container.name));
        patch.push(mark_partial(&ac.ptr));
    }
    for (idx, m) in ac.container.methods.iter().enumerate() {
        let ptr = format!("{}/methods/{idx}", ac.ptr);
        if !m.partial {
            notes.push(format!("method {:?} is not a partial declaration", m.name));
            patch.push(mark_partial(&ptr));
        }
        if m.body.is_some() {
            notes.push(format!("method {:?} has a body", m.name));
            patch.push(PatchOp::Remove {
                path: format!("{ptr}/body"),
            });
        }
    }

    if patch.is_empty() {
        return None;
    }
    let surface = ac.import.surface.as_deref().unwrap_or_default();
    let mut data = BTreeMap::new();
    data.insert("container".to_string(), Value::from(ac.container.name.clone()));
    data.insert("surface".to_string(), Value::from(surface));
    Some(Diagnostic {
        code: PRECONDITION_CODE.to_string(),
        severity: Severity::Warning,
        stage: Stage::Lint,
        message: format!(
            "import container {:?} must be partial, nested only in partial containers, and declare only partial methods without bodies",
            ac.container.name
        ),
        loc: Some(Location::Decl {
            ptr: ac.ptr.clone(),
        }),
        notes,
        data,
        quickfix: Some(Quickfix {
            kind: QuickfixKind::JsonPatch,
            patch,
            note: Some("Make container and enclosing containers partial and strip method bodies".to_string()),
        }),
    })
}

fn mark_partial(ptr: &str) -> PatchOp {
    PatchOp::Add {
        path: format!("{ptr}/partial"),
        value: Value::Bool(true),
    }
}

/// Applies every quickfix in `report` to the raw document; returns how many ran.
pub fn apply_quickfixes(doc: &mut Value, report: &Report) -> Result<usize, PatchError> {
    let mut applied = 0;
    for d in &report.diagnostics {
        if let Some(q) = &d.quickfix {
            json_patch::apply_patch(doc, &q.patch)?;
            applied += 1;
        }
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use modimport_contracts::DECLS_SCHEMA_VERSION;
    use serde_json::json;

    use super::*;

    #[test]
    fn well_formed_container_is_silent() {
        let doc: DeclDocument = serde_json::from_value(json!({
            "schema_version": DECLS_SCHEMA_VERSION,
            "containers": [{
                "name": "S", "partial": true, "import": {"surface": "S"},
                "methods": [{"name": "A", "partial": true}]
            }]
        }))
        .expect("decls");
        assert!(check_document(&doc).is_clean());
    }

    #[test]
    fn one_diagnostic_with_one_quickfix_per_container() {
        let doc: DeclDocument = serde_json::from_value(json!({
            "schema_version": DECLS_SCHEMA_VERSION,
            "containers": [{
                "name": "S", "import": {"surface": "S"},
                "methods": [
                    {"name": "A"},
                    {"name": "B", "partial": true, "body": "x"}
                ]
            }]
        }))
        .expect("decls");
        let report = check_document(&doc);
        assert!(report.ok, "precondition failures are warnings");
        assert_eq!(report.diagnostics.len(), 1);
        let d = &report.diagnostics[0];
        assert_eq!(d.code, PRECONDITION_CODE);
        assert_eq!(d.notes.len(), 3);
        let q = d.quickfix.as_ref().expect("quickfix");
        assert_eq!(q.kind, QuickfixKind::JsonPatch);
        assert_eq!(
            q.patch,
            vec![
                mark_partial("/containers/0"),
                mark_partial("/containers/0/methods/0"),
                PatchOp::Remove {
                    path: "/containers/0/methods/1/body".to_string()
                },
            ]
        );
    }
}
