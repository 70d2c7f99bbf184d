//! Rust source emission for import surfaces.
//!
//! A surface becomes one `pub mod` holding the binding table (callable type
//! aliases plus a `Slots` struct), a static `ImportCell` with the `load` /
//! `is_imported` / `import_state` / `attach` entry points, and one forwarding
//! function per signature.

use std::collections::{BTreeMap, BTreeSet};

use modimport_contracts::{DEFAULT_RUNTIME_PATH, GENERATOR_ID};
use tracing::{debug, warn};

use crate::error::GenError;
use crate::model::{Signature, Surface};
use crate::modes::{self, ModeProjection};
use crate::names::NameContext;
use crate::util;

mod forward;
mod state;
mod table;

/// Generated items living in the value namespace of every surface module.
const RESERVED_ITEMS: &[&str] = &[
    "IMPORTS",
    "SURFACE_NAME",
    "REQUIRED",
    "load",
    "is_imported",
    "import_state",
    "attach",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenOptions {
    /// Path the generated code uses to reach the runtime crate.
    pub runtime_path: String,
    /// Emit rustdoc on generated items.
    pub emit_docs: bool,
    /// Emit `use super::*;` so type references resolve against the parent module.
    pub import_parent: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            emit_docs: true,
            import_parent: true,
        }
    }
}

/// Output of a whole-document run. Surfaces that failed are left out of
/// `source` and reported in `errors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub source: String,
    pub modules: Vec<String>,
    pub errors: Vec<GenError>,
}

impl GeneratedFile {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Generates one surface module. `names` should be fresh for this surface.
pub fn generate_surface(
    surface: &Surface,
    names: &mut NameContext,
    options: &GenOptions,
) -> Result<String, GenError> {
    let plan = plan_surface(surface, names)?;
    debug!(
        surface = %surface.meta.surface_name,
        module = %plan.module,
        methods = plan.methods.len(),
        "generating import surface"
    );
    let mut emitter = Emitter::new(surface, options, plan);
    emitter.emit_surface();
    Ok(emitter.out)
}

/// One surface's generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSurface {
    pub surface_name: String,
    pub module: String,
    pub source: String,
}

/// Generates each surface independently, one result per input, in order.
///
/// Every surface gets a fresh name context, and a failing surface leaves its
/// siblings untouched. Input errors (from extraction) are passed through.
pub fn generate_document(
    surfaces: Vec<Result<Surface, GenError>>,
    options: &GenOptions,
) -> Vec<Result<GeneratedSurface, GenError>> {
    let mut module_owner: BTreeMap<String, String> = BTreeMap::new();
    surfaces
        .into_iter()
        .map(|surface| {
            let s = surface?;
            if let Some(other) = module_owner.get(&s.module) {
                return Err(GenError::DuplicateModule {
                    surface: s.meta.surface_name.clone(),
                    module: s.module.clone(),
                    other: other.clone(),
                });
            }
            let mut names = NameContext::new();
            let source = generate_surface(&s, &mut names, options)?;
            module_owner.insert(s.module.clone(), s.meta.surface_name.clone());
            Ok(GeneratedSurface {
                surface_name: s.meta.surface_name,
                module: s.module,
                source,
            })
        })
        .inspect(|r| {
            if let Err(err) = r {
                warn!(error = %err, "skipping import surface");
            }
        })
        .collect()
}

/// Generates every surface into one file.
///
/// `source_sha256` is recorded in the header when the surfaces came from a
/// file. Surfaces that fail are left out of the source and collected in
/// `errors`.
pub fn generate_file(
    surfaces: Vec<Result<Surface, GenError>>,
    source_sha256: Option<&str>,
    options: &GenOptions,
) -> GeneratedFile {
    let mut out = String::new();
    out.push_str(&format!("// @generated by {GENERATOR_ID}. Do not edit.\n"));
    if let Some(sha) = source_sha256 {
        out.push_str(&format!("// source-sha256: {sha}\n"));
    }

    let mut modules = Vec::new();
    let mut errors = Vec::new();
    for result in generate_document(surfaces, options) {
        match result {
            Ok(g) => {
                out.push('\n');
                out.push_str(&g.source);
                modules.push(g.module);
            }
            Err(err) => errors.push(err),
        }
    }

    GeneratedFile {
        source: out,
        modules,
        errors,
    }
}

/// A signature after naming and validation; emission cannot fail past this point.
#[derive(Debug, Clone)]
struct PlannedMethod<'a> {
    sig: &'a Signature,
    /// Disambiguated name: slot field, slot name and forwarding function.
    name: String,
    ident: String,
    params: Vec<PlannedParam<'a>>,
}

#[derive(Debug, Clone)]
struct PlannedParam<'a> {
    name: &'a str,
    ident: String,
    ty: &'a str,
    modes: ModeProjection,
}

impl PlannedMethod<'_> {
    fn alias(&self) -> String {
        format!("{}Fn", self.name)
    }

    fn return_type(&self) -> Option<&str> {
        self.sig.returns.as_deref().map(str::trim)
    }
}

struct SurfacePlan<'a> {
    module: String,
    methods: Vec<PlannedMethod<'a>>,
}

fn plan_surface<'a>(
    surface: &'a Surface,
    names: &mut NameContext,
) -> Result<SurfacePlan<'a>, GenError> {
    let surface_name = surface.meta.surface_name.as_str();
    if surface_name.trim().is_empty() {
        return Err(GenError::Metadata {
            container: surface.module.clone(),
            reason: "surface name must not be empty".to_string(),
        });
    }
    let module = util::rust_ident(&surface.module).map_err(|why| GenError::InvalidIdent {
        surface: surface_name.to_string(),
        ident: surface.module.clone(),
        context: format!("module name: {why}"),
    })?;

    let generated = names.assign_all(&surface.signatures);
    let mut plan = Vec::with_capacity(surface.signatures.len());

    for (sig, name) in surface.signatures.iter().zip(generated) {
        if RESERVED_ITEMS.contains(&name.as_str()) {
            return Err(GenError::ReservedName {
                surface: surface_name.to_string(),
                method: name,
            });
        }
        let ident = util::rust_ident(&name).map_err(|why| GenError::InvalidIdent {
            surface: surface_name.to_string(),
            ident: name.clone(),
            context: format!("method name: {why}"),
        })?;
        if sig.returns.as_deref().is_some_and(|ty| ty.trim().is_empty()) {
            return Err(GenError::EmptyType {
                surface: surface_name.to_string(),
                method: sig.name.clone(),
                what: "return type".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut params = Vec::with_capacity(sig.params.len());
        for p in &sig.params {
            if !seen.insert(p.name.as_str()) {
                return Err(GenError::DuplicateParam {
                    surface: surface_name.to_string(),
                    method: sig.name.clone(),
                    param: p.name.clone(),
                });
            }
            if p.ty.trim().is_empty() {
                return Err(GenError::EmptyType {
                    surface: surface_name.to_string(),
                    method: sig.name.clone(),
                    what: format!("parameter {:?}", p.name),
                });
            }
            let modes = modes::project(surface_name, &sig.name, p)?;
            let ident = util::rust_ident(&p.name).map_err(|why| GenError::InvalidIdent {
                surface: surface_name.to_string(),
                ident: p.name.clone(),
                context: format!("parameter of {}: {why}", sig.name),
            })?;
            params.push(PlannedParam {
                name: &p.name,
                ident,
                ty: p.ty.trim(),
                modes,
            });
        }

        plan.push(PlannedMethod {
            sig,
            name,
            ident,
            params,
        });
    }
    check_shadowed_types(surface_name, &plan)?;
    Ok(SurfacePlan {
        module,
        methods: plan,
    })
}

/// Generated type names are declared inside the surface module, where they
/// would silently win over same-named types brought in from the parent.
fn check_shadowed_types(surface: &str, plan: &[PlannedMethod<'_>]) -> Result<(), GenError> {
    let mut used: BTreeMap<&str, &str> = BTreeMap::new();
    for m in plan {
        let types = m.params.iter().map(|p| p.ty).chain(m.return_type());
        for token in types.flat_map(type_path_segments) {
            used.entry(token).or_insert(m.sig.name.as_str());
        }
    }
    let generated = plan
        .iter()
        .map(PlannedMethod::alias)
        .chain(std::iter::once("Slots".to_string()));
    for item in generated {
        if let Some(method) = used.get(item.as_str()) {
            return Err(GenError::ShadowedType {
                surface: surface.to_string(),
                item,
                method: method.to_string(),
            });
        }
    }
    Ok(())
}

/// Identifier segments of a type reference: `Vec<crate::PlayerFn>` yields
/// `Vec`, `crate` and `PlayerFn`.
fn type_path_segments(ty: &str) -> impl Iterator<Item = &str> {
    ty.split(|c: char| !(c == '_' || c.is_ascii_alphanumeric()))
        .filter(|t| !t.is_empty())
}

struct Emitter<'a> {
    surface: &'a Surface,
    options: &'a GenOptions,
    module: String,
    plan: Vec<PlannedMethod<'a>>,
    out: String,
    indent: usize,
}

impl<'a> Emitter<'a> {
    fn new(surface: &'a Surface, options: &'a GenOptions, plan: SurfacePlan<'a>) -> Self {
        Self {
            surface,
            options,
            module: plan.module,
            plan: plan.methods,
            out: String::new(),
            indent: 0,
        }
    }

    fn rt(&self, item: &str) -> String {
        format!("{}::{item}", self.options.runtime_path)
    }

    fn line(&mut self, s: &str) {
        if s.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn doc(&mut self, s: &str) {
        if !self.options.emit_docs {
            return;
        }
        if s.is_empty() {
            self.line("///");
        } else {
            self.line(&format!("/// {s}"));
        }
    }

    fn emit_surface(&mut self) {
        let meta = &self.surface.meta;
        let policy = if meta.required { "required" } else { "optional" };
        self.doc(&format!(
            "Import surface `{}` ({policy}).",
            meta.surface_name
        ));
        self.line(&format!("pub mod {} {{", self.module));
        self.indent += 1;
        self.line("#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports)]");
        self.line("");
        if self.options.import_parent {
            self.line("use super::*;");
            self.line("");
        }
        self.line(&format!(
            "pub const SURFACE_NAME: &str = {};",
            rust_str_literal(&meta.surface_name)
        ));
        self.line(&format!("pub const REQUIRED: bool = {};", meta.required));

        self.emit_binding_table();
        self.emit_import_state();
        self.emit_forwarders();

        self.indent -= 1;
        self.line("}");
    }

    /// `Surface.Method(ref i32 b, out i32 c)`, with definition-site keywords.
    fn describe(&self, m: &PlannedMethod<'_>) -> String {
        let params: Vec<String> = m
            .params
            .iter()
            .map(|p| p.modes.definition.describe(p.ty, p.name))
            .collect();
        let ret = match m.return_type() {
            Some(ty) => format!(" -> {ty}"),
            None => String::new(),
        };
        format!(
            "{}.{}({}){ret}",
            self.surface.meta.surface_name,
            m.sig.name,
            params.join(", ")
        )
    }
}

fn rust_str_literal(s: &str) -> String {
    format!("{s:?}")
}
