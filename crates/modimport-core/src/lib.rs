pub mod decls;
pub mod diagnostics;
pub mod error;
pub mod json_patch;
pub mod model;
pub mod modes;
pub mod names;
pub mod precheck;
pub mod rust_emit;

mod util;

pub use error::GenError;
pub use model::{Metadata, Parameter, ParameterMode, Signature, Surface};
pub use names::{NameContext, SignatureId};
pub use rust_emit::{
    generate_document, generate_file, generate_surface, GenOptions, GeneratedFile, GeneratedSurface,
};
