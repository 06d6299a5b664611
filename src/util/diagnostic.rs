//! User-friendly diagnostic messages.
//!
//! Every error shown to the user should name the root cause and, where one
//! exists, a concrete fix.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceOffset, SourceSpan};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a descriptor file cannot be parsed.
    pub const BROKEN_DESCRIPTOR: &str =
        "Reinstall the package or fix the JSON in its descriptor file";

    /// Suggestion when a descriptor lacks name or version.
    pub const INCOMPLETE_DESCRIPTOR: &str =
        "Package descriptors must declare string `name` and `version` fields";

    /// Suggestion when a chunk has no output asset.
    pub const MISSING_ASSET: &str =
        "Make sure the bundler emitted the chunk before manifests are generated";

    /// Suggestion when the manifest path is missing.
    pub const NO_OUTPUT_PATH: &str =
        "Set `path` in bundle-manifest.toml or pass `--path <template>`";

    /// Suggestion when writing fails.
    pub const WRITE_FAILED: &str = "Check that the output directory is writable";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m",
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m",
            (false, Severity::Error) => "error",
            (false, Severity::Warning) => "warning",
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Malformed descriptor report, pointing at the offending JSON location.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("failed to parse package descriptor `{path}`: {reason}")]
#[diagnostic(
    code(bundle_manifest::descriptor::parse),
    help("Reinstall the package or fix the JSON in its descriptor file")
)]
pub struct DescriptorParseReport {
    pub path: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("{reason}")]
    pub span: SourceSpan,
    pub reason: String,
}

impl DescriptorParseReport {
    /// Build a report from a serde_json error against the original text.
    pub fn new(path: &str, contents: &str, err: &serde_json::Error) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);
        let offset = SourceOffset::from_location(contents, line, column);

        DescriptorParseReport {
            path: path.to_string(),
            src: NamedSource::new(path, contents.to_string()),
            span: SourceSpan::new(offset, 0),
            reason: err.to_string(),
        }
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
