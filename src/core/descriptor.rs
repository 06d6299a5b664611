//! Package descriptors (`package.json`, `.bower.json`).
//!
//! Only `name` and `version` are interpreted. Every other field is kept
//! verbatim so the manifest can republish the descriptor unchanged.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::resolver::errors::DescriptorError;
use crate::util::diagnostic::DescriptorParseReport;

/// Descriptor file names, in lookup order.
pub const DESCRIPTOR_NAMES: [&str; 2] = ["package.json", ".bower.json"];

/// A parsed package descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    name: String,
    version: String,
    fields: Map<String, Value>,
}

impl PackageDescriptor {
    /// Parse descriptor text read from `path`.
    pub fn parse(path: &str, contents: &str) -> Result<Self, DescriptorError> {
        let value: Value = serde_json::from_str(contents).map_err(|err| {
            DescriptorError::Parse(Box::new(DescriptorParseReport::new(path, contents, &err)))
        })?;

        let Value::Object(fields) = value else {
            return Err(DescriptorError::NotAnObject {
                path: path.to_string(),
            });
        };

        let name = string_field(&fields, path, "name")?;
        let version = string_field(&fields, path, "version")?;

        Ok(PackageDescriptor {
            name,
            version,
            fields,
        })
    }

    /// Package name, including any `@scope/` prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Canonical `name@version` key.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// All descriptor fields, exactly as parsed.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn string_field(
    fields: &Map<String, Value>,
    path: &str,
    field: &'static str,
) -> Result<String, DescriptorError> {
    fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DescriptorError::MissingField {
            path: path.to_string(),
            field,
        })
}

impl Serialize for PackageDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.fields.serialize(serializer)
    }
}
