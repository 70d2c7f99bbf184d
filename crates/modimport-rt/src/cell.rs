use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ImportError, LoadError};
use crate::state::ImportState;

/// Name and policy of one surface, fixed at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceMeta {
    pub name: &'static str,
    pub required: bool,
}

impl SurfaceMeta {
    pub const fn new(name: &'static str, required: bool) -> Self {
        Self { name, required }
    }
}

/// The binding table of one surface.
///
/// Implemented by generated `Slots` structs: one optional function pointer per
/// signature, named by its disambiguated name.
pub trait SlotTable {
    /// Slot names in declaration order.
    const NAMES: &'static [&'static str];

    /// Whether each slot currently holds a callable, in `NAMES` order.
    fn resolution(&self) -> Vec<bool>;
}

struct Bindings<T> {
    slots: T,
    state: ImportState,
}

/// Slot table plus import state behind one lock.
///
/// `load` and `attach` are the only writers. Forwarded calls copy the slot
/// they need under a read lock and call it after the lock is released, so a
/// provider may call back into the surface.
pub struct ImportCell<T> {
    meta: SurfaceMeta,
    inner: RwLock<Bindings<T>>,
}

impl<T> ImportCell<T> {
    pub const fn new(meta: SurfaceMeta, slots: T) -> Self {
        Self {
            meta,
            inner: parking_lot::const_rwlock(Bindings {
                slots,
                state: ImportState::NotImported,
            }),
        }
    }

    pub fn meta(&self) -> SurfaceMeta {
        self.meta
    }

    pub fn state(&self) -> ImportState {
        self.inner.read().state
    }

    pub fn is_imported(&self) -> bool {
        self.state().is_imported()
    }

    /// Writes slots. The import state is left alone until the next `load`.
    ///
    /// `bind` runs under the write lock. Calling `state`, `is_imported`,
    /// `load` or `forward` on the same cell from inside it deadlocks.
    pub fn attach<R>(&self, bind: impl FnOnce(&mut T) -> R) -> R {
        bind(&mut self.inner.write().slots)
    }
}

impl<T: SlotTable> ImportCell<T> {
    /// Re-derives the import state from the current slot contents and enforces
    /// the surface's policy.
    ///
    /// Required surfaces fail unless every slot resolved. Optional surfaces
    /// tolerate total absence but still fail on a partial match.
    pub fn load(&self) -> Result<(), LoadError> {
        let surface = self.meta.name;
        let mut bindings = self.inner.write();

        let resolution = bindings.slots.resolution();
        let expected = T::NAMES.len();
        let resolved = resolution.iter().filter(|r| **r).count();
        let state = ImportState::from_counts(resolved, expected);
        bindings.state = state;

        match (state, self.meta.required) {
            (ImportState::Ok, _) => {
                debug!(surface, resolved, "import surface loaded");
                Ok(())
            }
            (ImportState::FailedImport, false) => {
                info!(
                    surface,
                    expected, "optional import surface is absent; calls will fail until it loads"
                );
                Ok(())
            }
            (ImportState::FailedImport, true) | (ImportState::PartialImport, _) => {
                let errors: Vec<ImportError> = T::NAMES
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| !resolution.get(*idx).copied().unwrap_or(false))
                    .map(|(_, method)| ImportError::Unresolved {
                        surface,
                        method: *method,
                        surface_present: resolved > 0,
                    })
                    .collect();
                warn!(
                    surface,
                    %state,
                    resolved,
                    expected,
                    required = self.meta.required,
                    "import surface did not fully bind"
                );
                Err(LoadError {
                    surface,
                    state,
                    errors,
                })
            }
            _ => {
                bindings.state = ImportState::UnknownFailure;
                warn!(surface, resolved, expected, "import slot count is inconsistent");
                Err(LoadError {
                    surface,
                    state: ImportState::UnknownFailure,
                    errors: vec![ImportError::InvariantViolation {
                        surface,
                        resolved,
                        expected,
                    }],
                })
            }
        }
    }

    /// Returns the slot a forwarded call should invoke, or the error that
    /// explains why it cannot be invoked right now.
    pub fn forward<F: Copy>(
        &self,
        method: &'static str,
        pick: impl FnOnce(&T) -> Option<F>,
    ) -> Result<F, ImportError> {
        let surface = self.meta.name;
        let bindings = self.inner.read();
        match bindings.state {
            ImportState::Ok => pick(&bindings.slots).ok_or(ImportError::Unavailable {
                surface,
                method,
                state: ImportState::Ok,
            }),
            ImportState::FailedImport => Err(ImportError::NotImported { surface, method }),
            ImportState::NotImported => Err(ImportError::NotLoaded { surface, method }),
            state @ (ImportState::PartialImport | ImportState::UnknownFailure) => {
                Err(ImportError::Unavailable {
                    surface,
                    method,
                    state,
                })
            }
        }
    }
}
