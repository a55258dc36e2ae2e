// SPDX-License-Identifier: MIT OR Apache-2.0
//! Case-insensitive 32-bit name hashes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-bit hash of an animation or resource name.
///
/// Hashing is SDBM over ASCII-lowercased bytes, so `"Walk.ani"` and
/// `"walk.ani"` resolve to the same animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NameHash(pub u32);

impl NameHash {
    /// The hash of the empty string
    pub const ZERO: NameHash = NameHash(0);

    /// Hash a name
    pub fn new(name: &str) -> Self {
        let hash = name.bytes().fold(0u32, |hash, byte| {
            u32::from(byte.to_ascii_lowercase())
                .wrapping_add(hash << 6)
                .wrapping_add(hash << 16)
                .wrapping_sub(hash)
        });
        Self(hash)
    }

    /// Get the raw hash value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<&str> for NameHash {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}
