//! Declaration documents: annotated containers and the methods declared in them.
//!
//! This is the hand-off format from whatever discovers annotated declarations.
//! Containers nest; a container carrying an `import` record is a surface.

use modimport_contracts::DECLS_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenError;
use crate::model::{Metadata, Parameter, Signature, Surface};
use crate::util;

#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    #[error("parse declaration document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("declaration document schema_version mismatch: expected {expected} got {got:?}")]
    SchemaVersion { expected: &'static str, got: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclDocument {
    pub schema_version: String,
    #[serde(default)]
    pub containers: Vec<ContainerDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDecl {
    pub name: String,
    /// Whether generated members may be added to this container.
    #[serde(default)]
    pub partial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportAttr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerDecl>,
}

/// The annotation that marks a container as an import surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAttr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub partial: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Present when the method already has an implementation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl MethodDecl {
    /// A partial declaration with no body: the only shape the generator accepts.
    pub fn is_empty_partial(&self) -> bool {
        self.partial && self.body.is_none()
    }

    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            params: self.params.clone(),
            returns: self.returns.clone(),
        }
    }
}

/// An annotated container together with where it sits in the document.
#[derive(Debug, Clone)]
pub struct AnnotatedContainer<'a> {
    pub container: &'a ContainerDecl,
    pub import: &'a ImportAttr,
    /// JSON Pointer to the container, e.g. `/containers/0/containers/1`.
    pub ptr: String,
    /// Enclosing containers, outermost first, with their pointers.
    pub ancestors: Vec<(&'a ContainerDecl, String)>,
}

impl DeclDocument {
    pub fn annotated(&self) -> Vec<AnnotatedContainer<'_>> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for (idx, c) in self.containers.iter().enumerate() {
            walk(c, format!("/containers/{idx}"), &mut path, &mut out);
        }
        out
    }

    /// One entry per annotated container, in document order.
    pub fn surfaces(&self) -> Vec<Result<Surface, GenError>> {
        self.annotated().iter().map(extract_surface).collect()
    }
}

fn walk<'a>(
    c: &'a ContainerDecl,
    ptr: String,
    path: &mut Vec<(&'a ContainerDecl, String)>,
    out: &mut Vec<AnnotatedContainer<'a>>,
) {
    if let Some(import) = &c.import {
        out.push(AnnotatedContainer {
            container: c,
            import,
            ptr: ptr.clone(),
            ancestors: path.clone(),
        });
    }
    path.push((c, ptr.clone()));
    for (idx, child) in c.containers.iter().enumerate() {
        walk(child, format!("{ptr}/containers/{idx}"), path, out);
    }
    path.pop();
}

fn extract_surface(ac: &AnnotatedContainer<'_>) -> Result<Surface, GenError> {
    let surface_name = match ac.import.surface.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(GenError::Metadata {
                container: ac.container.name.clone(),
                reason: "import surface name is missing or empty".to_string(),
            })
        }
    };
    let signatures = ac
        .container
        .methods
        .iter()
        .filter(|m| m.is_empty_partial())
        .map(MethodDecl::signature)
        .collect();
    Ok(Surface {
        meta: Metadata::new(surface_name, ac.import.required.unwrap_or(false)),
        module: util::snake_case(&ac.container.name),
        signatures,
    })
}

pub fn parse_decls_json(bytes: &[u8]) -> Result<DeclDocument, DeclError> {
    let doc: DeclDocument = serde_json::from_slice(bytes)?;
    if doc.schema_version.trim() != DECLS_SCHEMA_VERSION {
        return Err(DeclError::SchemaVersion {
            expected: DECLS_SCHEMA_VERSION,
            got: doc.schema_version,
        });
    }
    Ok(doc)
}

/// Hex SHA-256 of a declaration document, recorded in generated headers.
pub fn source_digest(bytes: &[u8]) -> String {
    util::sha256_hex(bytes)
}
