//! Bundle text rewriting.
//!
//! Appends one registration statement per qualified id after the bundle the
//! host emitted, so the runtime registry can resolve each bundled module by
//! its `name@version/subpath` without loading it twice.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Module, ModuleRegistration, QualifiedId, RegistrationKey};

/// How a shim reaches into the chunk's registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShimStyle {
    /// `require(chunk)['raw request']`: the chunk exports an object keyed by request.
    #[default]
    Property,
    /// `require(chunk)(moduleId)`: the chunk exports its module require function.
    Call,
}

impl ShimStyle {
    /// The registration key for `module` under this style.
    pub fn key_for(&self, module: &Module) -> RegistrationKey {
        match self {
            ShimStyle::Property => RegistrationKey::Request(module.request().to_string()),
            ShimStyle::Call => RegistrationKey::Id(module.id.clone()),
        }
    }
}

impl FromStr for ShimStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "property" => Ok(ShimStyle::Property),
            "call" => Ok(ShimStyle::Call),
            other => Err(format!(
                "unknown shim style `{}` (expected `property` or `call`)",
                other
            )),
        }
    }
}

impl fmt::Display for ShimStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShimStyle::Property => write!(f, "property"),
            ShimStyle::Call => write!(f, "call"),
        }
    }
}

/// Prefix and registry settings for the rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Global object exposing the registry API (`System`)
    pub registry_global: String,
    /// Prepend the `"bundle";` marker
    pub bundle_marker: bool,
    /// Bind `define` to the registry's AMD define
    pub amd_define: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            registry_global: "System".to_string(),
            bundle_marker: true,
            amd_define: true,
        }
    }
}

/// Escape `s` for use inside a single-quoted JavaScript string.
pub fn js_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render one `registerDynamic` statement.
pub fn registration_statement(
    registry_global: &str,
    qualified_id: &QualifiedId,
    chunk_name: &str,
    key: &RegistrationKey,
) -> String {
    let chunk = js_single_quoted(chunk_name);
    let access = match key {
        RegistrationKey::Request(request) => format!("[{}]", js_single_quoted(request)),
        RegistrationKey::Id(id) => format!("({})", id.to_js_literal()),
    };

    format!(
        "{global}.registerDynamic({qid}, [{chunk}], true, function(require, exports, module) {{ module.exports = require({chunk}){access}; }});",
        global = registry_global,
        qid = js_single_quoted(qualified_id.as_str()),
    )
}

/// Produce the rewritten bundle text.
///
/// The original text is kept byte for byte between the optional prefixes and
/// the appended statements. Applying this to its own output appends twice.
pub fn rewrite(
    original: &str,
    chunk_name: &str,
    registrations: &IndexMap<QualifiedId, ModuleRegistration>,
    options: &RewriteOptions,
) -> String {
    let mut source = String::with_capacity(original.len() + registrations.len() * 160 + 64);

    if options.bundle_marker {
        source.push_str("\"bundle\";");
    }
    if options.amd_define {
        source.push_str(&format!("var define = {}.amdDefine;", options.registry_global));
    }
    source.push_str(original);
    source.push('\n');

    for (qualified_id, registration) in registrations {
        source.push_str(&registration_statement(
            &options.registry_global,
            qualified_id,
            chunk_name,
            &registration.id,
        ));
        source.push('\n');
    }

    source
}
