//! Shared, version-pinned protocol identifiers.
//!
//! These constants are the single source of truth for schema/version strings that
//! appear in machine-readable I/O: declaration documents, batch manifests and
//! diagnostic reports.

pub const DECLS_SCHEMA_VERSION: &str = "modimport.decls@0.1.0";
pub const MANIFEST_SCHEMA_VERSION: &str = "modimport.manifest@0.1.0";
pub const DIAG_SCHEMA_VERSION: &str = "modimport.diag@0.1.0";

/// Written into the header of every generated file.
pub const GENERATOR_ID: &str = "modimport";

/// Default path under which generated code reaches the runtime crate.
pub const DEFAULT_RUNTIME_PATH: &str = "::modimport_rt";
