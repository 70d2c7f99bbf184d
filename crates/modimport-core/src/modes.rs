//! Projections of a parameter's passing mode.
//!
//! One mode maps to three spellings: the callable type stored in the slot, the
//! forwarding function's own parameter list, and the argument handed to the
//! slot when forwarding. The two read-only reference flavors differ at the
//! definition but forward identically.

use crate::error::GenError;
use crate::model::{Parameter, ParameterMode};

/// How a parameter is declared, both in the slot's callable type and in the
/// forwarding function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionMode {
    Value,
    Ref,
    Out,
    In,
    RefReadonly,
}

/// How a parameter is handed on to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    Value,
    Ref,
    Out,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProjection {
    pub delegate: DefinitionMode,
    pub definition: DefinitionMode,
    pub forward: ForwardMode,
}

/// Maps one parameter's mode. Unsupported modes are a configuration error
/// naming the parameter.
pub fn project(surface: &str, method: &str, param: &Parameter) -> Result<ModeProjection, GenError> {
    let (definition, forward) = match &param.mode {
        ParameterMode::ByValue => (DefinitionMode::Value, ForwardMode::Value),
        ParameterMode::Ref => (DefinitionMode::Ref, ForwardMode::Ref),
        ParameterMode::Out => (DefinitionMode::Out, ForwardMode::Out),
        ParameterMode::In => (DefinitionMode::In, ForwardMode::In),
        ParameterMode::RefReadonly => (DefinitionMode::RefReadonly, ForwardMode::In),
        ParameterMode::Unsupported(raw) => {
            return Err(GenError::UnsupportedMode {
                surface: surface.to_string(),
                method: method.to_string(),
                param: param.name.clone(),
                mode: raw.clone(),
            })
        }
    };
    Ok(ModeProjection {
        delegate: definition,
        definition,
        forward,
    })
}

impl DefinitionMode {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            DefinitionMode::Value => None,
            DefinitionMode::Ref => Some("ref"),
            DefinitionMode::Out => Some("out"),
            DefinitionMode::In => Some("in"),
            DefinitionMode::RefReadonly => Some("ref readonly"),
        }
    }

    /// Rust type of a parameter declared with this mode.
    pub fn render_type(self, ty: &str) -> String {
        match self {
            DefinitionMode::Value => ty.to_string(),
            DefinitionMode::Ref => format!("&mut {ty}"),
            DefinitionMode::Out => format!("&mut ::core::mem::MaybeUninit<{ty}>"),
            DefinitionMode::In | DefinitionMode::RefReadonly => format!("&{ty}"),
        }
    }

    /// `ref i32 b`, as echoed in generated docs.
    pub fn describe(self, ty: &str, name: &str) -> String {
        match self.keyword() {
            Some(kw) => format!("{kw} {ty} {name}"),
            None => format!("{ty} {name}"),
        }
    }
}

impl ForwardMode {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            ForwardMode::Value => None,
            ForwardMode::Ref => Some("ref"),
            ForwardMode::Out => Some("out"),
            ForwardMode::In => Some("in"),
        }
    }

    /// Argument expression that passes `ident` on to the slot.
    pub fn render_arg(self, ident: &str) -> String {
        match self {
            ForwardMode::Value | ForwardMode::In => ident.to_string(),
            ForwardMode::Ref | ForwardMode::Out => format!("&mut *{ident}"),
        }
    }
}
