use std::fmt;

/// Aggregate binding status of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImportState {
    /// No `load` has run yet.
    #[default]
    NotImported,
    /// Every expected slot resolved.
    Ok,
    /// Some, but not all, slots resolved.
    PartialImport,
    /// No slot resolved.
    FailedImport,
    /// The slot count did not add up. Never expected in normal operation.
    UnknownFailure,
}

impl ImportState {
    /// Derives the aggregate state from a slot count.
    ///
    /// A zero-slot surface is trivially `Ok`. More resolved slots than
    /// expected means the table misreported itself and maps to
    /// `UnknownFailure`.
    pub fn from_counts(resolved: usize, expected: usize) -> Self {
        if resolved == expected {
            ImportState::Ok
        } else if resolved == 0 {
            ImportState::FailedImport
        } else if resolved < expected {
            ImportState::PartialImport
        } else {
            ImportState::UnknownFailure
        }
    }

    pub fn is_imported(self) -> bool {
        self == ImportState::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImportState::NotImported => "NotImported",
            ImportState::Ok => "Ok",
            ImportState::PartialImport => "PartialImport",
            ImportState::FailedImport => "FailedImport",
            ImportState::UnknownFailure => "UnknownFailure",
        }
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
