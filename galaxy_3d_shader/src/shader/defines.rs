/// Canonical form and hashing of preprocessor define strings.
///
/// A define string is free text of space-separated tokens supplied when a
/// variation is requested. Only spaces are normalized: `"A B"` and `"B A"`
/// stay distinct, as do `"A"` and `"A A"`.

use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Canonicalize a define string
///
/// Leading and trailing spaces are dropped and every interior run of spaces
/// collapses to a single space. An all-space input yields an empty string.
pub fn canonicalize_defines(raw: &str) -> String {
    let trimmed = raw.trim_matches(' ');
    let mut result = String::with_capacity(trimmed.len());

    let mut num_spaces = 0u32;
    for c in trimmed.chars() {
        if c == ' ' {
            num_spaces += 1;
        } else {
            num_spaces = 0;
        }

        if num_spaces <= 1 {
            result.push(c);
        }
    }

    result
}

/// Individual define tokens of a canonical define string
pub fn split_defines(canonical: &str) -> impl Iterator<Item = &str> {
    canonical.split(' ').filter(|token| !token.is_empty())
}

/// Content hash of a canonical define string (xxh3-64)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DefinesHash(pub u64);

impl DefinesHash {
    /// Hash an already-canonical define string
    pub fn of(canonical: &str) -> Self {
        Self(xxh3_64(canonical.as_bytes()))
    }

    /// Raw hash value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DefinesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
#[path = "defines_tests.rs"]
mod tests;
