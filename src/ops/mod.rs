//! High-level operations.
//!
//! Synthesis builds a chunk's manifest, rewrite produces its registered
//! bundle text, and emit runs both for every chunk and writes the results.

pub mod emit;
pub mod entry;
pub mod rewrite;
pub mod synthesize;

pub use emit::{emit, plan, EmitError, EmitOptions, EmittedChunk, PreparedChunk, Strategy};
pub use entry::render_entry_module;
pub use rewrite::{rewrite, RewriteOptions, ShimStyle};
pub use synthesize::{synthesize, SynthesisContext};
