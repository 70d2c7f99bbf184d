use std::collections::BTreeMap;

use modimport_contracts::DIAG_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// JSON Pointer into the declaration document.
    Decl { ptr: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quickfix {
    pub kind: QuickfixKind,
    pub patch: Vec<PatchOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickfixKind {
    JsonPatch,
}

/// RFC 6902 operations; only the ones the rewrite tool produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Test { path: String, value: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quickfix: Option<Quickfix>,
}

impl Diagnostic {
    fn ptr(&self) -> &str {
        match &self.loc {
            Some(Location::Decl { ptr }) => ptr,
            None => "",
        }
    }
}

/// Sort key for a JSON Pointer: array indexes compare numerically.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PtrSegment<'a> {
    Index(usize),
    Key(&'a str),
}

fn ptr_key(ptr: &str) -> Vec<PtrSegment<'_>> {
    ptr.split('/')
        .skip(1)
        .map(|seg| match seg.parse::<usize>() {
            Ok(idx) => PtrSegment::Index(idx),
            Err(_) => PtrSegment::Key(seg),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub schema_version: String,
    pub ok: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn ok() -> Self {
        Self {
            schema_version: DIAG_SCHEMA_VERSION.to_string(),
            ok: true,
            diagnostics: Vec::new(),
        }
    }

    /// Sorts by location (document order) then code, and clears `ok` if any
    /// error is present.
    pub fn with_diagnostics(mut self, mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort_by(|a, b| {
            ptr_key(a.ptr())
                .cmp(&ptr_key(b.ptr()))
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.message.cmp(&b.message))
        });
        self.ok = diagnostics.iter().all(|d| d.severity != Severity::Error);
        self.diagnostics = diagnostics;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn patch_ops_serialize_as_rfc6902() {
        let op = PatchOp::Add {
            path: "/a".to_string(),
            value: json!(true),
        };
        assert_eq!(
            serde_json::to_value(&op).expect("encode op"),
            json!({"op": "add", "path": "/a", "value": true})
        );
        let back: PatchOp =
            serde_json::from_value(json!({"op": "remove", "path": "/b"})).expect("decode op");
        assert_eq!(
            back,
            PatchOp::Remove {
                path: "/b".to_string()
            }
        );
    }

    fn warning_at(ptr: Option<&str>) -> Diagnostic {
        Diagnostic {
            code: "MI0001".to_string(),
            severity: Severity::Warning,
            stage: Stage::Lint,
            message: "m".to_string(),
            loc: ptr.map(|p| Location::Decl { ptr: p.to_string() }),
            notes: Vec::new(),
            data: BTreeMap::new(),
            quickfix: None,
        }
    }

    #[test]
    fn warnings_keep_report_ok() {
        let report = Report::ok().with_diagnostics(vec![warning_at(None)]);
        assert!(report.ok);
        assert!(!report.is_clean());
        let v = serde_json::to_value(&report).expect("encode report");
        assert_eq!(v["diagnostics"][0]["stage"], json!("lint"));
    }

    #[test]
    fn diagnostics_follow_document_order() {
        let ptrs = [
            "/containers/10",
            "/containers/2/containers/0",
            "/containers/2",
            "/containers/1",
        ];
        let report =
            Report::ok().with_diagnostics(ptrs.iter().map(|p| warning_at(Some(*p))).collect());
        let got: Vec<&str> = report.diagnostics.iter().map(Diagnostic::ptr).collect();
        assert_eq!(
            got,
            vec![
                "/containers/1",
                "/containers/2",
                "/containers/2/containers/0",
                "/containers/10",
            ]
        );
    }
}
