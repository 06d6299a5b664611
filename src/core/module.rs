//! Bundled modules as handed over by the host bundler.
//!
//! These are read-only views of the host's module graph. Field names follow
//! the host's camelCase serialization.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The id a bundler assigned to a module. Used at runtime to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleId {
    Number(u64),
    Name(String),
}

impl ModuleId {
    /// Render the id as a JavaScript literal (numbers bare, names quoted).
    pub fn to_js_literal(&self) -> String {
        match self {
            ModuleId::Number(n) => n.to_string(),
            ModuleId::Name(name) => {
                serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
            }
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Number(n) => write!(f, "{}", n),
            ModuleId::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u64> for ModuleId {
    fn from(n: u64) -> Self {
        ModuleId::Number(n)
    }
}

impl From<&str> for ModuleId {
    fn from(name: &str) -> Self {
        ModuleId::Name(name.to_string())
    }
}

/// Exports a module provides, when the bundler could determine them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProvidedExports {
    Known(Vec<String>),
    /// Not statically determinable (`null` or `true` in the host's output).
    #[default]
    Unknown,
}

impl ProvidedExports {
    /// The export list, if known.
    pub fn as_known(&self) -> Option<&[String]> {
        match self {
            ProvidedExports::Known(names) => Some(names),
            ProvidedExports::Unknown => None,
        }
    }
}

impl Serialize for ProvidedExports {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ProvidedExports::Known(names) => names.serialize(serializer),
            ProvidedExports::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ProvidedExports {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Array(_) => {
                let names = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
                Ok(ProvidedExports::Known(names))
            }
            _ => Ok(ProvidedExports::Unknown),
        }
    }
}

/// A unit of bundled source code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Internal identifier (usually an absolute path, possibly synthetic)
    pub identifier: String,

    /// Request string exactly as written in the importing code
    #[serde(default)]
    pub raw_request: Option<String>,

    /// Request after loader resolution (absolute resource path)
    #[serde(default)]
    pub user_request: Option<String>,

    /// Runtime module id
    pub id: ModuleId,

    /// Opaque build metadata
    #[serde(default)]
    pub build_meta: serde_json::Value,

    #[serde(default)]
    pub provided_exports: ProvidedExports,

    /// Context-relative library identity (e.g. `./node_modules/lodash/index.js`)
    #[serde(default)]
    pub lib_ident: Option<String>,
}

impl Module {
    pub fn new(identifier: impl Into<String>, id: impl Into<ModuleId>) -> Self {
        Module {
            identifier: identifier.into(),
            raw_request: None,
            user_request: None,
            id: id.into(),
            build_meta: serde_json::Value::Null,
            provided_exports: ProvidedExports::Unknown,
            lib_ident: None,
        }
    }

    pub fn with_raw_request(mut self, request: impl Into<String>) -> Self {
        self.raw_request = Some(request.into());
        self
    }

    pub fn with_user_request(mut self, request: impl Into<String>) -> Self {
        self.user_request = Some(request.into());
        self
    }

    pub fn with_build_meta(mut self, meta: serde_json::Value) -> Self {
        self.build_meta = meta;
        self
    }

    pub fn with_exports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provided_exports = ProvidedExports::Known(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_lib_ident(mut self, ident: impl Into<String>) -> Self {
        self.lib_ident = Some(ident.into());
        self
    }

    /// The path used to locate the module's package.
    ///
    /// This is the user request when the host supplied one, else the identifier.
    pub fn identifying_path(&self) -> &str {
        match self.user_request.as_deref() {
            Some(request) if !request.is_empty() => request,
            _ => &self.identifier,
        }
    }

    /// The raw request, falling back to the identifier.
    pub fn request(&self) -> &str {
        self.raw_request.as_deref().unwrap_or(&self.identifier)
    }
}
