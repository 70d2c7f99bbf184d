use crate::state::ImportState;

/// A single violated expectation on an import surface.
///
/// Every message names the surface, the method when one is involved, and what
/// the caller can do about it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// A forwarded call ran before `load()`.
    #[error(
        "import surface \"{surface}\" has not been loaded yet; call load() before calling \"{surface}.{method}\""
    )]
    NotLoaded {
        surface: &'static str,
        method: &'static str,
    },

    /// A forwarded call ran after `load()` found no provider.
    #[error(
        "import surface \"{surface}\" was not successfully imported, so \"{surface}.{method}\" cannot be called; check is_imported() before calling it"
    )]
    NotImported {
        surface: &'static str,
        method: &'static str,
    },

    /// A forwarded call ran while the surface is in a state that cannot dispatch.
    #[error(
        "\"{surface}.{method}\" is unavailable while import surface \"{surface}\" is in state {state}; inspect import_state() to diagnose the binding"
    )]
    Unavailable {
        surface: &'static str,
        method: &'static str,
        state: ImportState,
    },

    /// A slot was still empty when `load()` ran.
    #[error(
        "\"{surface}.{method}\" did not resolve ({}); check that the surface is present and that its method signatures match",
        presence_note(.surface_present)
    )]
    Unresolved {
        surface: &'static str,
        method: &'static str,
        surface_present: bool,
    },

    /// The slot table reported an impossible count.
    #[error(
        "import surface \"{surface}\" reported {resolved} resolved slots out of {expected}; this is a bug in modimport, please report it upstream"
    )]
    InvariantViolation {
        surface: &'static str,
        resolved: usize,
        expected: usize,
    },
}

impl ImportError {
    pub fn surface(&self) -> &'static str {
        match self {
            ImportError::NotLoaded { surface, .. }
            | ImportError::NotImported { surface, .. }
            | ImportError::Unavailable { surface, .. }
            | ImportError::Unresolved { surface, .. }
            | ImportError::InvariantViolation { surface, .. } => surface,
        }
    }

    pub fn method(&self) -> Option<&'static str> {
        match self {
            ImportError::NotLoaded { method, .. }
            | ImportError::NotImported { method, .. }
            | ImportError::Unavailable { method, .. }
            | ImportError::Unresolved { method, .. } => Some(method),
            ImportError::InvariantViolation { .. } => None,
        }
    }
}

fn presence_note(surface_present: &bool) -> &'static str {
    if *surface_present {
        "the surface is present but this method is missing"
    } else {
        "the surface is not present at all"
    }
}

/// Raised by `load()` when a surface fails to bind under its policy.
///
/// Holds one [`ImportError`] per unresolved slot, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "failed to load import surface \"{surface}\" ({state}): {}",
    join_messages(.errors)
)]
pub struct LoadError {
    pub surface: &'static str,
    pub state: ImportState,
    pub errors: Vec<ImportError>,
}

impl LoadError {
    /// Methods whose slots were empty, in slot order.
    pub fn unresolved_methods(&self) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter_map(|e| match e {
                ImportError::Unresolved { method, .. } => Some(*method),
                _ => None,
            })
            .collect()
    }
}

fn join_messages(errors: &[ImportError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
