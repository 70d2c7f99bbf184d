//! Runtime support for generated import surfaces.
//!
//! Generated modules keep their slot table and import state in an
//! [`ImportCell`]. The cell derives the aggregate [`ImportState`] on every
//! [`ImportCell::load`] and gates every forwarded call on it.

mod cell;
mod error;
mod state;

pub use cell::{ImportCell, SlotTable, SurfaceMeta};
pub use error::{ImportError, LoadError};
pub use state::ImportState;
