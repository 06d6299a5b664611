//! Descriptor resolution error types and diagnostics.

use std::io;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic, DescriptorParseReport};

/// Error while reading or parsing a package descriptor.
///
/// A resolution miss is not an error; these only arise once a descriptor
/// file has been found.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read package descriptor `{path}`")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(Box<DescriptorParseReport>),

    #[error("package descriptor `{path}` is not a JSON object")]
    NotAnObject { path: String },

    #[error("package descriptor `{path}` has no string `{field}` field")]
    MissingField { path: String, field: &'static str },
}

impl DescriptorError {
    /// Path of the descriptor that failed.
    pub fn path(&self) -> &str {
        match self {
            DescriptorError::Read { path, .. }
            | DescriptorError::NotAnObject { path }
            | DescriptorError::MissingField { path, .. } => path,
            DescriptorError::Parse(report) => &report.path,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_location(self.path());

        match self {
            DescriptorError::Read { source, .. } => diag.with_context(source.to_string()),
            DescriptorError::Parse(_) => diag.with_suggestion(suggestions::BROKEN_DESCRIPTOR),
            DescriptorError::NotAnObject { .. } | DescriptorError::MissingField { .. } => {
                diag.with_suggestion(suggestions::INCOMPLETE_DESCRIPTOR)
            }
        }
    }
}
