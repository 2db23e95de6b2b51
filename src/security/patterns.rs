//! Dangerous pattern list.
//!
//! The list is built once at startup (defaults or configuration) and then only
//! read. Entries are plain text fragments, matched case-insensitively as
//! substrings by the classifier. Order matters: the first matching entry is the
//! one reported.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

/// Fragments flagged out of the box.
pub const DEFAULT_DANGEROUS_PATTERNS: &[&str] = &[
    "rm -rf /",
    "rm -rf /*",
    "rm -rf *",
    "rm -rf ~",
    "rm -rf $HOME",
    "> /dev/sda",
    "dd if=",
    "mkfs",
    "format",
    "diskutil",
    ":(){:|:&};:",
    "chmod -R 777 /",
    "| sh",
    "| bash",
    "| zsh",
];

/// Ordered, immutable list of dangerous text fragments.
///
/// Cloning is cheap; clones share the same backing storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DangerPatterns {
    patterns: Arc<[String]>,
}

impl Default for DangerPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_DANGEROUS_PATTERNS.iter().copied())
    }
}

impl DangerPatterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// A list that flags nothing.
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<String>())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'de> Deserialize<'de> for DangerPatterns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let patterns = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::new(patterns))
    }
}
