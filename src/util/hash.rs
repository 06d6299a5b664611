//! Hashing utilities for compilation and chunk hashes.
//!
//! Hosts normally hand us the hashes they computed; these are used when the
//! serialized compilation does not carry one.

use sha2::{Digest, Sha256};

/// Length of generated hashes, matching the usual bundler default.
pub const HASH_LENGTH: usize = 20;

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Finish and return the full hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finish and return a digest truncated to [`HASH_LENGTH`].
    pub fn finish_short(self) -> String {
        let mut hash = self.finish();
        hash.truncate(HASH_LENGTH);
        hash
    }
}
