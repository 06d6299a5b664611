//! Test fixtures for common test scenarios.
//!
//! The shared scenario is one `vendors` chunk built from three modules:
//! `lodash` (unscoped package), `@org/util` (scoped package) and a local
//! application file with no package descriptor above it.

use serde_json::json;

use crate::core::{Chunk, Compilation, EntryDependency, EntryModule, Module};
use crate::test_support::MemoryFileSystem;

pub const LODASH_DESCRIPTOR: &str = "/app/node_modules/lodash/package.json";
pub const UTIL_DESCRIPTOR: &str = "/app/node_modules/@org/util/package.json";

/// Compilation hash used by the scenario.
pub const SCENARIO_HASH: &str = "cafebabe";

/// Filesystem holding the two scenario packages.
pub fn scenario_fs() -> MemoryFileSystem {
    let fs = MemoryFileSystem::new();
    fs.add_file(
        LODASH_DESCRIPTOR,
        r#"{"name": "lodash", "version": "4.17.0", "main": "index.js", "license": "MIT"}"#,
    );
    fs.add_file(
        UTIL_DESCRIPTOR,
        r#"{"name": "@org/util", "version": "2.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
    );
    fs
}

/// The three scenario modules, in graph order.
pub fn scenario_modules() -> Vec<Module> {
    vec![
        Module::new("/app/node_modules/lodash/index.js", 1u64)
            .with_raw_request("lodash")
            .with_build_meta(json!({"exportsType": "dynamic"}))
            .with_lib_ident("./node_modules/lodash/index.js"),
        Module::new("/app/node_modules/@org/util/lib/a.js", 2u64)
            .with_raw_request("@org/util/lib/a")
            .with_exports(["a", "b"])
            .with_lib_ident("./node_modules/@org/util/lib/a.js"),
        Module::new("/src/local.js", 3u64).with_raw_request("./local"),
    ]
}

/// A compilation with a single `vendors` chunk over [`scenario_modules`].
pub fn scenario_compilation() -> Compilation {
    let mut chunk = Chunk::new("vendors").with_file("vendors.bundle.js");
    for module in scenario_modules() {
        chunk = chunk.with_module(module);
    }
    chunk.entry_dependencies = vec![
        EntryDependency {
            request: "lodash".to_string(),
            module: Some(EntryModule {
                raw_request: "lodash".to_string(),
                id: 1u64.into(),
            }),
        },
        EntryDependency {
            request: "@org/util/lib/a".to_string(),
            module: Some(EntryModule {
                raw_request: "@org/util/lib/a".to_string(),
                id: 2u64.into(),
            }),
        },
    ];

    let mut compilation = Compilation {
        hash: Some(SCENARIO_HASH.to_string()),
        chunks: vec![chunk],
        ..Compilation::default()
    };
    compilation.replace_asset(
        "vendors.bundle.js",
        "var vendors_cafebabe = function(modules) { /* bootstrap */ }([]);".to_string(),
    );
    compilation
}
