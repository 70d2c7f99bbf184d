/// Configuration errors detected while generating one surface.
///
/// Any of these aborts the surface it names; sibling surfaces still generate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    #[error("malformed import metadata on container {container:?}: {reason}")]
    Metadata { container: String, reason: String },

    #[error(
        "surface {surface:?}: parameter {param:?} of method {method:?} uses unsupported passing mode {mode:?}"
    )]
    UnsupportedMode {
        surface: String,
        method: String,
        param: String,
        mode: String,
    },

    #[error("surface {surface:?}: {what} of method {method:?} has an empty type")]
    EmptyType {
        surface: String,
        method: String,
        what: String,
    },

    #[error("surface {surface:?}: {ident:?} cannot be used as a Rust identifier ({context})")]
    InvalidIdent {
        surface: String,
        ident: String,
        context: String,
    },

    #[error("surface {surface:?}: method {method:?} collides with a generated item of the same name")]
    ReservedName { surface: String, method: String },

    #[error(
        "surface {surface:?}: generated item {item:?} would shadow the type of the same name used by method {method:?}; rename the method or the type"
    )]
    ShadowedType {
        surface: String,
        item: String,
        method: String,
    },

    #[error("surface {surface:?}: method {method:?} declares parameter {param:?} more than once")]
    DuplicateParam {
        surface: String,
        method: String,
        param: String,
    },

    #[error("surface {surface:?}: module name {module:?} is already used by surface {other:?}")]
    DuplicateModule {
        surface: String,
        module: String,
        other: String,
    },
}

impl GenError {
    /// The surface this error aborted, when known.
    pub fn surface(&self) -> Option<&str> {
        match self {
            GenError::Metadata { .. } => None,
            GenError::UnsupportedMode { surface, .. }
            | GenError::EmptyType { surface, .. }
            | GenError::InvalidIdent { surface, .. }
            | GenError::ReservedName { surface, .. }
            | GenError::ShadowedType { surface, .. }
            | GenError::DuplicateParam { surface, .. }
            | GenError::DuplicateModule { surface, .. } => Some(surface),
        }
    }
}
