use serde::{Deserialize, Serialize};

/// Name and policy of one import surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "surface")]
    pub surface_name: String,
    #[serde(default)]
    pub required: bool,
}

impl Metadata {
    pub fn new(surface_name: impl Into<String>, required: bool) -> Self {
        Self {
            surface_name: surface_name.into(),
            required,
        }
    }
}

/// How a parameter is passed.
///
/// Read from its textual spelling; anything unknown is kept verbatim so the
/// generator can reject it with the parameter's name attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterMode {
    #[default]
    ByValue,
    Ref,
    Out,
    In,
    RefReadonly,
    Unsupported(String),
}

impl ParameterMode {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterMode::ByValue => "value",
            ParameterMode::Ref => "ref",
            ParameterMode::Out => "out",
            ParameterMode::In => "in",
            ParameterMode::RefReadonly => "ref readonly",
            ParameterMode::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for ParameterMode {
    fn from(raw: String) -> Self {
        let words: Vec<&str> = raw.split_whitespace().collect();
        match words.as_slice() {
            [] | ["value"] => ParameterMode::ByValue,
            ["ref"] => ParameterMode::Ref,
            ["out"] => ParameterMode::Out,
            ["in"] => ParameterMode::In,
            ["ref", "readonly"] => ParameterMode::RefReadonly,
            _ => ParameterMode::Unsupported(raw),
        }
    }
}

impl From<ParameterMode> for String {
    fn from(mode: ParameterMode) -> Self {
        match mode {
            ParameterMode::Unsupported(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
    #[serde(default)]
    pub mode: ParameterMode,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, mode: ParameterMode) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            mode,
        }
    }
}

/// One imported operation. `returns: None` means the method returns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, returns: Option<&str>) -> Self {
        Self {
            name: name.into(),
            params,
            returns: returns.map(str::to_string),
        }
    }

    pub fn returns_void(&self) -> bool {
        self.returns.is_none()
    }
}

/// Everything the generator needs for one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub meta: Metadata,
    /// Name of the emitted Rust module.
    pub module: String,
    /// Order matters: it fixes name disambiguation and emission order.
    pub signatures: Vec<Signature>,
}
