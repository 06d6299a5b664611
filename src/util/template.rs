//! Output path templates.
//!
//! Expands the bracketed placeholders bundlers use in output options:
//! `[name]`, `[id]`, `[hash]` and `[chunkhash]`. Hash placeholders accept a
//! length suffix (`[hash:8]`). Anything else is left untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(name|id|hash|chunkhash)(?::(\d+))?\]").expect("placeholder pattern is valid")
});

/// Values available to a template expansion.
#[derive(Debug, Clone, Copy)]
pub struct PathData<'a> {
    /// Chunk name, substituted for `[name]`
    pub name: &'a str,
    /// Chunk id, substituted for `[id]` (falls back to the name)
    pub id: Option<&'a str>,
    /// Compilation hash, substituted for `[hash]`
    pub hash: &'a str,
    /// Chunk content hash, substituted for `[chunkhash]` (falls back to `hash`)
    pub chunk_hash: Option<&'a str>,
}

/// Expand all placeholders in `template`.
pub fn render_path(template: &str, data: &PathData<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let value = match &caps[1] {
                "name" => data.name,
                "id" => data.id.unwrap_or(data.name),
                "hash" => data.hash,
                "chunkhash" => data.chunk_hash.unwrap_or(data.hash),
                _ => return caps[0].to_string(),
            };

            match caps.get(2).and_then(|len| len.as_str().parse::<usize>().ok()) {
                Some(len) => value.chars().take(len).collect(),
                None => value.to_string(),
            }
        })
        .into_owned()
}

/// Check whether a template contains any recognized placeholder.
pub fn has_placeholders(template: &str) -> bool {
    PLACEHOLDER.is_match(template)
}
