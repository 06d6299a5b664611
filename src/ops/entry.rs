//! Entry module rendering.
//!
//! A bundle registered under a chunk name exports one object whose keys are
//! the raw requests of its entry dependencies. Property-style shims index that
//! object, so the entry body has to be rendered in exactly this shape.

use crate::core::EntryDependency;

/// Render the body of a chunk's entry module.
///
/// ```text
/// module.exports = {
///  'lodash' : __webpack_require__(12),
///  'react' : __webpack_require__(4)
/// }
/// ```
///
/// With `pathinfo`, each require carries a `/*! request */` comment.
pub fn render_entry_module(dependencies: &[EntryDependency], pathinfo: bool) -> String {
    let mut out = String::from("module.exports = {\n");

    for (idx, dependency) in dependencies.iter().enumerate() {
        match &dependency.module {
            Some(module) => {
                out.push_str(&format!(
                    " {} : __webpack_require__(",
                    crate::ops::rewrite::js_single_quoted(&module.raw_request)
                ));
                if pathinfo {
                    out.push_str(&format!("/*! {} */ ", comment_safe(&dependency.request)));
                }
                out.push_str(&module.id.to_js_literal());
                out.push(')');
            }
            None => {
                let message = format!("Cannot find module \"{}\"", dependency.request);
                out.push_str(&format!(
                    "(function webpackMissingModule() {{ throw new Error({}); }}())",
                    serde_json::to_string(&message).unwrap_or_else(|_| "\"\"".to_string())
                ));
            }
        }

        if idx + 1 != dependencies.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("}\n");
    out
}

fn comment_safe(request: &str) -> String {
    request.replace("*/", "*_/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntryModule, ModuleId};

    fn dep(request: &str, id: Option<u64>) -> EntryDependency {
        EntryDependency {
            request: request.to_string(),
            module: id.map(|id| EntryModule {
                raw_request: request.to_string(),
                id: ModuleId::Number(id),
            }),
        }
    }

    #[test]
    fn test_render_entry() {
        let out = render_entry_module(&[dep("lodash", Some(12)), dep("react", Some(4))], false);
        assert_eq!(
            out,
            "module.exports = {\n 'lodash' : __webpack_require__(12),\n 'react' : __webpack_require__(4)\n}\n"
        );
    }

    #[test]
    fn test_render_entry_pathinfo() {
        let out = render_entry_module(&[dep("lodash", Some(12))], true);
        assert_eq!(
            out,
            "module.exports = {\n 'lodash' : __webpack_require__(/*! lodash */ 12)\n}\n"
        );
    }

    #[test]
    fn test_render_missing_module() {
        let out = render_entry_module(&[dep("ghost", None), dep("react", Some(4))], false);
        assert!(out.contains(
            r#"(function webpackMissingModule() { throw new Error("Cannot find module \"ghost\""); }()),"#
        ));
        assert!(out.ends_with(" 'react' : __webpack_require__(4)\n}\n"));
    }

    #[test]
    fn test_render_empty_entry() {
        assert_eq!(render_entry_module(&[], false), "module.exports = {\n}\n");
    }
}
